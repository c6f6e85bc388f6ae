pub mod api_token;
pub mod json_body;
