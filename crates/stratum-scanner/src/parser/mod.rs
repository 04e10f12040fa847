//! Parsers for artifact content and structured config files

pub mod frontmatter;
pub mod mcp;

pub use frontmatter::{extract_description, sha256_hex};
pub use mcp::mcp_servers_object;
