pub mod image_desc_route;
