//! Web-search providers
//!
//! Each provider wraps one external search API behind the [`Provider`] trait.
//! The [`ProviderRegistry`] decides per call which providers may run.

mod registry;
mod traits;

pub mod bing;
pub mod brave;
pub mod google_pse;
pub mod groq;
pub mod serpapi;

pub use registry::ProviderRegistry;
pub use traits::*;

pub use bing::Bing;
pub use brave::Brave;
pub use google_pse::GooglePse;
pub use groq::Groq;
pub use serpapi::SerpApi;
