pub mod vision_chat_service;
