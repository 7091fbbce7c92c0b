pub mod chat_request;
pub mod chat_ws_route;
pub mod send_message_route;
