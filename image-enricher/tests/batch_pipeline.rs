use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
};

use image_enricher::{
    EnrichError, EnrichmentRequest, ImageCaptioner, ImageEnricher, ImageSource, PromptSettings,
    encode_base64,
};
use serde_json::json;

type BoxFut<'a, T> = Pin<Box<dyn Future<Output = Result<T, EnrichError>> + Send + 'a>>;

/// Serves fixed bytes per address and records the order of requests.
#[derive(Default)]
struct StubSource {
    images: HashMap<String, Vec<u8>>,
    seen: Mutex<Vec<String>>,
}

impl StubSource {
    fn with(images: &[(&str, &str)]) -> Self {
        Self {
            images: images
                .iter()
                .map(|(a, b)| (a.to_string(), b.as_bytes().to_vec()))
                .collect(),
            seen: Mutex::default(),
        }
    }
}

impl ImageSource for StubSource {
    fn fetch<'a>(&'a self, address: &'a str) -> BoxFut<'a, Vec<u8>> {
        Box::pin(async move {
            self.seen.lock().unwrap().push(address.to_string());
            self.images
                .get(address)
                .cloned()
                .ok_or_else(|| EnrichError::Fetch {
                    address: address.to_string(),
                    reason: "HTTP 404 Not Found".into(),
                })
        })
    }
}

/// Answers from a queue; `Err` entries simulate a failed model call.
struct StubCaptioner {
    answers: Mutex<Vec<Result<String, String>>>,
    calls: Mutex<Vec<(String, PromptSettings)>>,
}

impl StubCaptioner {
    fn new(answers: Vec<Result<&str, &str>>) -> Self {
        Self {
            answers: Mutex::new(
                answers
                    .into_iter()
                    .rev()
                    .map(|a| a.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            calls: Mutex::default(),
        }
    }

    fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ImageCaptioner for StubCaptioner {
    fn caption<'a>(
        &'a self,
        image_data_uri: &'a str,
        settings: &'a PromptSettings,
    ) -> BoxFut<'a, String> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push((image_data_uri.to_string(), settings.clone()));
            match self.answers.lock().unwrap().pop() {
                Some(Ok(text)) => Ok(text),
                Some(Err(status)) => Err(EnrichError::ModelCall(status)),
                None => Err(EnrichError::ModelCall("no stubbed answer left".into())),
            }
        })
    }
}

fn caption(description: &str, entity: &str) -> String {
    json!({"description": description, "entity": entity}).to_string()
}

fn request(records: &[(&str, &str, &str)]) -> EnrichmentRequest {
    let values: Vec<_> = records
        .iter()
        .map(|(id, url, qs)| json!({"recordId": id, "data": {"url": url, "queryString": qs}}))
        .collect();
    serde_json::from_value(json!({ "values": values })).unwrap()
}

fn enricher(source: Arc<StubSource>, captioner: Arc<StubCaptioner>) -> ImageEnricher {
    ImageEnricher::new(source, captioner, PromptSettings::default())
}

#[tokio::test]
async fn single_record_end_to_end() {
    let source = Arc::new(StubSource::with(&[(
        "https://example/img.jpg?sig=abc",
        "jpeg-bytes",
    )]));
    let captioner = Arc::new(StubCaptioner::new(vec![Ok(
        r#"{"description": "A red car on a street.", "entity": "car"}"#,
    )]));

    let resp = enricher(source.clone(), captioner.clone())
        .enrich(request(&[("1", "https://example/img.jpg", "?sig=abc")]))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&resp).unwrap(),
        json!({"values": [{"recordId": "1", "data": {"description": "A red car on a street.", "entity": "car"}}]})
    );
    assert_eq!(
        source.seen.lock().unwrap().as_slice(),
        ["https://example/img.jpg?sig=abc"]
    );

    let calls = captioner.calls.lock().unwrap();
    let (uri, settings) = &calls[0];
    assert_eq!(
        uri,
        &format!("data:image/jpeg;base64,{}", encode_base64(b"jpeg-bytes"))
    );
    assert_eq!(settings, &PromptSettings::default());
}

#[tokio::test]
async fn preserves_order_and_record_ids() {
    let source = Arc::new(StubSource::with(&[
        ("https://a/1.jpg?t", "1"),
        ("https://a/2.jpg?t", "2"),
        ("https://a/3.jpg?t", "3"),
    ]));
    let answers = [
        caption("one", "cat"),
        caption("two", "dog"),
        caption("three", "tree"),
    ];
    let captioner = Arc::new(StubCaptioner::new(
        answers.iter().map(|a| Ok(a.as_str())).collect(),
    ));

    let resp = enricher(source.clone(), captioner)
        .enrich(request(&[
            ("z-9", "https://a/1.jpg", "?t"),
            ("a-1", "https://a/2.jpg", "?t"),
            ("m-5", "https://a/3.jpg", "?t"),
        ]))
        .await
        .unwrap();

    let ids: Vec<_> = resp.values.iter().map(|v| v.record_id.as_str()).collect();
    assert_eq!(ids, ["z-9", "a-1", "m-5"]);
    let entities: Vec<_> = resp.values.iter().map(|v| v.data.entity.as_str()).collect();
    assert_eq!(entities, ["cat", "dog", "tree"]);
    assert_eq!(
        source.seen.lock().unwrap().as_slice(),
        ["https://a/1.jpg?t", "https://a/2.jpg?t", "https://a/3.jpg?t"]
    );

    for v in &resp.values {
        let data = serde_json::to_value(&v.data).unwrap();
        let keys: Vec<_> = data.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 2);
        assert!(data["description"].is_string() && data["entity"].is_string());
    }
}

#[tokio::test]
async fn empty_batch_yields_empty_values() {
    let source = Arc::new(StubSource::default());
    let captioner = Arc::new(StubCaptioner::new(vec![]));

    let resp = enricher(source, captioner.clone())
        .enrich(request(&[]))
        .await
        .unwrap();

    assert_eq!(serde_json::to_value(&resp).unwrap(), json!({"values": []}));
    assert_eq!(captioner.calls(), 0);
}

#[tokio::test]
async fn model_failure_aborts_whole_batch() {
    let source = Arc::new(StubSource::with(&[
        ("https://a/1.jpg", "1"),
        ("https://a/2.jpg", "2"),
        ("https://a/3.jpg", "3"),
    ]));
    let first = caption("ok", "cat");
    let captioner = Arc::new(StubCaptioner::new(vec![
        Ok(first.as_str()),
        Err("HTTP 500 Internal Server Error"),
        Ok(first.as_str()),
    ]));

    let err = enricher(source.clone(), captioner.clone())
        .enrich(request(&[
            ("1", "https://a/1.jpg", ""),
            ("2", "https://a/2.jpg", ""),
            ("3", "https://a/3.jpg", ""),
        ]))
        .await
        .unwrap_err();

    assert!(matches!(err, EnrichError::ModelCall(ref m) if m.contains("500")));
    // Record 3 is never attempted.
    assert_eq!(captioner.calls(), 2);
    assert_eq!(source.seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn fetch_failure_aborts_before_model_call() {
    let source = Arc::new(StubSource::with(&[("https://a/1.jpg", "1")]));
    let ok = caption("ok", "cat");
    let captioner = Arc::new(StubCaptioner::new(vec![Ok(ok.as_str()), Ok(ok.as_str())]));

    let err = enricher(source, captioner.clone())
        .enrich(request(&[
            ("1", "https://a/1.jpg", ""),
            ("2", "https://a/missing.jpg", "?sig=x"),
        ]))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "IMAGE_FETCH_FAILED");
    assert_eq!(captioner.calls(), 1);
}

#[tokio::test]
async fn malformed_model_output_aborts_batch() {
    let source = Arc::new(StubSource::with(&[("https://a/1.jpg", "1")]));
    let captioner = Arc::new(StubCaptioner::new(vec![Ok(
        r#"{"description": "A cat.", "entity": "cat", "colour": "black"}"#,
    )]));

    let err = enricher(source, captioner)
        .enrich(request(&[("1", "https://a/1.jpg", "")]))
        .await
        .unwrap_err();

    assert!(matches!(err, EnrichError::MalformedModelOutput(_)));
}

#[tokio::test]
async fn custom_prompt_settings_reach_captioner() {
    let source = Arc::new(StubSource::with(&[("https://a/1.jpg", "1")]));
    let ok = caption("d", "e");
    let captioner = Arc::new(StubCaptioner::new(vec![Ok(ok.as_str())]));
    let settings = PromptSettings {
        system_prompt: "short".into(),
        temperature: 0.0,
        top_p: 1.0,
        max_tokens: 50,
    };

    ImageEnricher::new(source, captioner.clone(), settings.clone())
        .enrich(request(&[("1", "https://a/1.jpg", "")]))
        .await
        .unwrap();

    assert_eq!(captioner.calls.lock().unwrap()[0].1, settings);
}
