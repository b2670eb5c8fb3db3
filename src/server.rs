//! Indexing server (tracker).
//!
//! The indexing server brokers discovery only: peers tell it which files they
//! serve and ask it which peers serve a file. File contents never pass
//! through it.
//!
//! # Session
//!
//! Each accepted connection gets its own task running a small state machine:
//!
//! ```text
//! AwaitIdentity --identity--> AwaitRequest --REGISTER/DEREGISTER/SEARCH--> AwaitRequest
//!                                   |
//!                                   +--DISCONNECT / unknown tag / I/O error--> purge, close
//! ```
//!
//! A connection that fails before announcing an identity is closed without
//! touching the index. Any later failure purges the peer from every entry;
//! that purge is the only cleanup path, there is no heartbeat.
//!
//! # Examples
//!
//! ```no_run
//! use rshare::server::IndexServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = IndexServer::bind("0.0.0.0:9999").await?;
//! println!("tracker listening on {}", server.local_addr()?);
//! server.run().await;
//! # Ok(())
//! # }
//! ```

mod error;
mod index_server;
mod session;

pub use error::ServerError;
pub use index_server::IndexServer;

#[cfg(test)]
mod tests;
