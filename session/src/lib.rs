//! FILENAME: session/src/lib.rs
//! PURPOSE: Library root for talking to a SmartView provider.
//! CONTEXT: Wraps the grid model and filter parser in request/response
//! exchanges with a provider endpoint (Hyperion Financial Management or
//! Essbase).
//!
//! PIPELINE: Session op --> Request (req_<Method>) --> Transport --> res_<Method> --> Grid / members / POV

pub mod config;
mod error;
pub mod request;
pub mod session;
pub mod transport;

pub use config::SessionConfig;
pub use error::{SessionError, TransportError};
pub use request::Request;
pub use session::{Credentials, CubeView, Session};
pub use transport::{HttpTransport, Transport};

// The model types callers need alongside a session.
pub use filter_parser::{Filter, ResolvedFilter};
pub use grid_engine::{AxisSpec, CellValue, Grid, GridLayout, Pov, Preferences};
pub use wire::ProviderKind;
