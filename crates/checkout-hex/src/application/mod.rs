pub mod http_response;
pub mod order_controller;
