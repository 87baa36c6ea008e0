pub const DEFAULT_API_URL: &str = "https://api.talabia.net/api";

pub fn default_request_timeout() -> u64 {
    60
}

pub fn default_list_timeout() -> u64 {
    crate::list::DEFAULT_LIST_TIMEOUT_SECS
}
