pub mod health_route;
pub mod image_desc;
