mod email;
mod post;
mod send;

pub use post::quote_handler;
pub use send::send_quote_handler;
