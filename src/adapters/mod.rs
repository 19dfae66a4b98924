// Adapters: concrete implementations of the domain ports (http, session files, clocks).

pub mod clock;
pub mod http;
pub mod session;
pub mod wire;
