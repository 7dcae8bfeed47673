// Interface adapters: HTTP client, credential persistence, command grammar and rendering.

pub mod clients;
pub mod commands;
pub mod credentials;
pub mod render;
