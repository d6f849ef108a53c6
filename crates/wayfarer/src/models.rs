//! These models represent the objects passed around by the agent
//!
//! There are two related formats we need to interact with:
//! - the OpenAI-style function-calling wire format both backends speak
//! - requests against the tool registry
//!
//! Incoming data is converted into these internal structs immediately (see
//! `providers::utils`), so nothing downstream of a provider ever touches the
//! wire format directly.
pub mod message;
pub mod tool;
