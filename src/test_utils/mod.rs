#![allow(missing_docs)]

pub(crate) mod app;
pub(crate) mod http;

pub(crate) use app::{get_test_app_state, get_test_server};
pub(crate) use http::{assert_content_type, assert_json_message, parse_json_body};
