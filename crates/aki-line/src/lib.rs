//! aki-line: LINE Gateway for Akinator
//!
//! LINE Messaging API の Webhook を受け取り、Akinator のゲームを中継します。
//! セッション管理、コマンドの解釈、返信メッセージの組み立てを行います。

pub mod api;
pub mod bot;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod reply;
pub mod session;
pub mod types;
pub mod webhook;

#[cfg(test)]
mod testing;

pub use api::{LineApiClient, LineMessenger};
pub use bot::LineBot;
pub use dispatcher::Dispatcher;
pub use error::{LineError, Result};
pub use session::SessionRegistry;
