mod output;

pub use output::{
    display_body, display_error, display_json, display_session, display_success, mask_token,
};
