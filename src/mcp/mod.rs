/// MCP (Model Context Protocol) server implementation
///
/// JSON-RPC message types live in `protocol`; the stdio loop and tool
/// dispatch live in `server`.

pub mod protocol;
pub mod server;

pub use server::McpServer;
