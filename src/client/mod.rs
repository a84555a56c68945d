// Remote tree access

pub mod http;
pub mod path_spec;

use crate::core::error::Result;
use crate::core::trace::NodePayload;

/// Opens per-shot connections to a tree-structured data server.
pub trait TreeClient {
    type Connection: TreeConnection;

    /// Open `tree` for `shot`. An unknown shot is a retrieval error.
    ///
    /// The returned connection is released when dropped.
    fn open(&self, tree: &str, shot: i32) -> Result<Self::Connection>;
}

/// An open tree. Dropping it releases the connection.
pub trait TreeConnection {
    fn get_node(&mut self, node: &str) -> Result<NodePayload>;
}
