pub mod logging;

// URL-synchronized catalog search: state controller, URL adapter, endpoint client
pub mod search;
