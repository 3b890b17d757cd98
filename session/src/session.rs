//! FILENAME: session/src/session.rs
//! PURPOSE: Connection and cube lifecycle against a SmartView provider.
//! CONTEXT: Each operation is one request/response exchange. The session
//! holds the connection (session id, provider, credentials) and which cube
//! is open; the dimension list and POV of that cube are handed back to the
//! caller as a `CubeView` and passed in again where a grid is built.
//!
//! LIFECYCLE: connect --> open_cube --> (queries) --> close_cube

use crate::config::SessionConfig;
use crate::request::Request;
use crate::transport::{HttpTransport, Transport};
use crate::SessionError;
use filter_parser::{default_filter, resolve_filter, Filter, FilterError, ResolvedFilter};
use grid_engine::{DimsBlock, Grid, GridLayout, Pov, Preferences};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use wire::{split_fields, split_fields_exact, Element, ProviderKind, XmlWriter};

// ============================================================================
// TYPES
// ============================================================================

/// How to authenticate on connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Password { user: String, password: String },
    /// Single sign-on token from an earlier session.
    Sso(String),
}

impl Credentials {
    pub fn password(user: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Password {
            user: user.into(),
            password: password.into(),
        }
    }
}

/// The open cube as seen by the caller: its dimensions in cube order and
/// the current POV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeView {
    pub server: String,
    pub app: String,
    pub cube: String,
    pub dimensions: Vec<String>,
    pub pov: Pov,
}

impl CubeView {
    /// Overrides the POV members named in `update`.
    pub fn set_pov(&mut self, update: &Pov) {
        self.pov = self.pov.merge(update);
    }
}

#[derive(Debug)]
struct Connection {
    session_id: String,
    provider: String,
    kind: ProviderKind,
    user: Option<String>,
    /// Held only until an SSO token has been obtained.
    password: Option<String>,
    sso: Option<String>,
}

#[derive(Debug)]
struct OpenCube {
    app: String,
    cube: String,
}

pub struct Session<T: Transport> {
    config: SessionConfig,
    transport: T,
    preferences: Preferences,
    connection: Option<Connection>,
    open_cube: Option<OpenCube>,
}

impl Session<HttpTransport> {
    /// Session over HTTP to `config.provider_url`.
    pub fn http(config: SessionConfig) -> Result<Self, SessionError> {
        let transport = HttpTransport::new(&config)?;
        Self::new(config, transport)
    }
}

impl<T: Transport> Session<T> {
    pub fn new(config: SessionConfig, transport: T) -> Result<Self, SessionError> {
        let preferences = config.load_preferences()?;
        Ok(Session {
            config,
            transport,
            preferences,
            connection: None,
            open_cube: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    pub fn session_id(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.session_id.as_str())
    }

    /// Provider description as reported on connect.
    pub fn provider(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.provider.as_str())
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.connection.as_ref().map_or(ProviderKind::Unknown, |c| c.kind)
    }

    pub fn sso_token(&self) -> Option<&str> {
        self.connection.as_ref().and_then(|c| c.sso.as_deref())
    }

    pub fn is_attached(&self) -> bool {
        self.attached().is_ok()
    }

    // ========================================================================
    // CONNECTION
    // ========================================================================

    /// Obtains a session id and identifies the provider.
    pub fn connect(&mut self, credentials: Credentials) -> Result<(), SessionError> {
        if self.connection.is_some() {
            return Err(SessionError::AlreadyConnected);
        }

        let (user, password, sso) = match credentials {
            Credentials::Password { user, password } => {
                info!("Connecting to {} using userid/password", self.config.provider_url);
                (Some(user), Some(password), None)
            }
            Credentials::Sso(token) => {
                info!("Connecting to {} using SSO token", self.config.provider_url);
                (None, None, Some(token))
            }
        };

        let request = Request::build("ConnectToProvider", |w| {
            w.text_element("ClientXMLVersion", &[], &self.config.client_xml_version)?;
            match (&sso, &user, &password) {
                (Some(token), _, _) => w.text_element("sso", &[], token)?,
                (None, user, password) => {
                    w.text_element("usr", &[], user.as_deref().unwrap_or_default())?;
                    w.text_element("pwd", &[], password.as_deref().unwrap_or_default())?;
                }
            }
            w.text_element("lngs", &[("enc", "0")], &self.config.language)?;
            Ok(())
        })?;
        let res = self.invoke(&request)?;

        let session_id = res.require("sID")?.text();
        let provider = res.require("provider")?.text();
        let kind = ProviderKind::from_description(&provider);
        info!("Connected to {} provider '{}'", kind, provider);

        self.connection = Some(Connection {
            session_id,
            provider,
            kind,
            user,
            password,
            sso,
        });
        Ok(())
    }

    /// Opens `app.cube` on `server` and returns its dimensions and default POV.
    ///
    /// With password credentials an SSO token is requested after the
    /// application opens, and the password is dropped.
    pub fn open_cube(&mut self, server: &str, app: &str, cube: &str) -> Result<CubeView, SessionError> {
        let conn = self.connection.as_ref().ok_or(SessionError::NotConnected)?;
        self.open_cube = None;

        info!("Opening cube {}.{} on {}", app, cube, server);
        let request = Request::build("OpenApplication", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            match &conn.sso {
                Some(token) => w.text_element("sso", &[], token)?,
                None => {
                    w.text_element("usr", &[], conn.user.as_deref().unwrap_or_default())?;
                    w.text_element("pwd", &[], conn.password.as_deref().unwrap_or_default())?;
                }
            }
            w.text_element("srv", &[], server)?;
            w.text_element("app", &[], app)?;
            Ok(())
        })?;
        self.invoke(&request)?;

        if conn.sso.is_none() {
            let request = Request::build("GetSSOToken", |w| {
                w.text_element("sID", &[], &conn.session_id)?;
                Ok(())
            })?;
            let token = self.invoke(&request)?.require("sso")?.text();
            if let Some(conn) = self.connection.as_mut() {
                conn.sso = Some(token);
                conn.password = None;
            }
        }

        let conn = self.connection.as_ref().ok_or(SessionError::NotConnected)?;
        let request = Request::build("OpenCube", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            w.text_element("srv", &[], server)?;
            w.text_element("app", &[], app)?;
            w.text_element("cube", &[], cube)?;
            Ok(())
        })?;
        self.invoke(&request)?;
        self.open_cube = Some(OpenCube {
            app: app.to_string(),
            cube: cube.to_string(),
        });

        let (dimensions, pov) = self.fetch_default_pov()?;
        Ok(CubeView {
            server: server.to_string(),
            app: app.to_string(),
            cube: cube.to_string(),
            dimensions,
            pov,
        })
    }

    /// Logs out of the open cube. Does nothing when no cube is open.
    pub fn close_cube(&mut self) -> Result<(), SessionError> {
        let (Some(conn), Some(open)) = (&self.connection, &self.open_cube) else {
            return Ok(());
        };
        info!("Disconnecting from {}.{}", open.app, open.cube);
        let request = Request::build("Logout", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            Ok(())
        })?;
        self.invoke(&request)?;
        self.open_cube = None;
        Ok(())
    }

    // ========================================================================
    // METADATA
    // ========================================================================

    /// Dimension names in cube order.
    pub fn dimensions(&self) -> Result<Vec<String>, SessionError> {
        let conn = self.attached()?;
        info!("Retrieving list of dimensions");
        let request = Request::build("EnumDims", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            w.text_element("alsTbl", &[], &self.preferences.alias_table)?;
            Ok(())
        })?;
        let res = self.invoke(&request)?;

        let mut dims = res
            .find_all("dimList/dim")
            .into_iter()
            .map(|dim| Ok((dim.attr_usize("id")?, dim.require_attr("name")?.to_string())))
            .collect::<Result<Vec<_>, SessionError>>()?;
        dims.sort_by_key(|(id, _)| *id);
        Ok(dims.into_iter().map(|(_, name)| name).collect())
    }

    /// Member filters the provider offers for `dimension`.
    pub fn filters(&self, dimension: &str) -> Result<Vec<Filter>, SessionError> {
        let conn = self.attached()?;
        info!("Retrieving list of available member filters for {}", dimension);
        let request = Request::build("EnumFilters", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            w.text_element("dim", &[], dimension)?;
            Ok(())
        })?;
        let res = self.invoke(&request)?;
        Ok(Filter::parse_catalog(&res)?)
    }

    /// Resolves a filter expression for `dimension`. The provider's filter
    /// catalog is only fetched when the static grammar cannot resolve it.
    pub fn resolve_filter(&self, dimension: &str, expression: Option<&str>) -> Result<ResolvedFilter, SessionError> {
        let kind = self.provider_kind();
        match resolve_filter(kind, dimension, expression, &[]) {
            Err(FilterError::UnrecognisedFilterExpression(_)) => {
                let catalog = self.filters(dimension)?;
                Ok(resolve_filter(kind, dimension, expression, &catalog)?)
            }
            resolved => Ok(resolved?),
        }
    }

    /// Members of `dimension`, optionally restricted by a filter expression.
    pub fn members(
        &self,
        dimension: &str,
        filter: Option<&str>,
        all_generations: bool,
    ) -> Result<Vec<String>, SessionError> {
        let conn = self.attached()?;
        let filter = self.resolve_filter(dimension, filter)?;

        info!("Retrieving list of members for {}", dimension);
        let request = Request::build("EnumMembers", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            w.text_element("dim", &[], dimension)?;
            w.element("memberFilter", &[], |w| filter.write_xml(w))?;
            w.text_element("getAtts", &[], "0")?;
            w.text_element("alsTbl", &[], &self.preferences.alias_table)?;
            w.text_element("allGenerations", &[], if all_generations { "1" } else { "0" })?;
            Ok(())
        })?;
        let res = self.invoke(&request)?;
        Ok(split_fields(&res.require("mbrs")?.text()))
    }

    /// Searches `dimension` for members matching `pattern`. Each result is
    /// the path of members from the top of the hierarchy to a match.
    pub fn find_member(&self, dimension: &str, pattern: &str) -> Result<Vec<Vec<String>>, SessionError> {
        let conn = self.attached()?;
        let filter = default_filter(conn.kind, dimension);

        info!("Finding members of {} matching '{}'", dimension, pattern);
        let request = Request::build("FindMember", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            w.text_element("dim", &[], dimension)?;
            w.text_element("mbr", &[], pattern)?;
            filter.write_xml(w)?;
            w.text_element("alsTbl", &[], &self.preferences.alias_table)?;
            Ok(())
        })?;
        let res = self.invoke(&request)?;

        res.find_all("pathList/path")
            .into_iter()
            .map(|path| Ok(split_fields(&path.require("mbrs")?.text())))
            .collect()
    }

    /// Default POV of the open cube, one member per dimension.
    pub fn default_pov(&self) -> Result<Pov, SessionError> {
        Ok(self.fetch_default_pov()?.1)
    }

    fn fetch_default_pov(&self) -> Result<(Vec<String>, Pov), SessionError> {
        let conn = self.attached()?;
        info!("Retrieving default POV");
        let request = Request::build("GetDefaultPOV", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            w.text_element("getAtts", &[], "0")?;
            w.text_element("alsTbl", &[], &self.preferences.alias_table)?;
            Ok(())
        })?;
        let res = self.invoke(&request)?;

        let dims = split_fields(&res.require("dims")?.text());
        let mbrs = split_fields_exact(&res.require("mbrs")?.text(), dims.len()).ok_or_else(|| {
            SessionError::Malformed {
                method: request.method().to_string(),
                detail: format!("expected {} POV members", dims.len()),
            }
        })?;
        let pov = dims.iter().cloned().zip(mbrs).collect();
        Ok((dims, pov))
    }

    // ========================================================================
    // GRIDS
    // ========================================================================

    /// The provider's default grid for `pov`.
    pub fn default_grid(&self, pov: &Pov) -> Result<Grid, SessionError> {
        let conn = self.attached()?;
        info!("Retrieving default grid");
        let request = Request::build("GetDefaultGrid", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            self.preferences.write_xml(w, conn.kind)?;
            write_background_pov(w, pov)?;
            Ok(())
        })?;
        let res = self.invoke(&request)?;
        Ok(Grid::from_xml(&res)?)
    }

    /// Sends `grid` back to the provider and returns it with data filled in.
    pub fn refresh(&self, grid: &Grid) -> Result<Grid, SessionError> {
        let conn = self.attached()?;
        info!("Refreshing grid");
        let request = Request::build("Refresh", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            self.preferences.write_xml(w, conn.kind)?;
            grid.write_xml(w, DimsBlock::Include)?;
            Ok(())
        })?;
        let res = self.invoke(&request)?;
        Ok(Grid::from_xml(&res)?)
    }

    /// Builds a grid from `layout`, lets the provider lay it out and then
    /// refreshes it so the result carries data. `pov` overrides members of
    /// the cube's current POV for this grid only.
    pub fn free_form_grid(&self, cube: &CubeView, pov: &Pov, layout: &GridLayout) -> Result<Grid, SessionError> {
        let conn = self.attached()?;
        let pov = cube.pov.merge(pov);
        let grid = Grid::define_layout(&cube.dimensions, &pov, layout)?;

        info!("Retrieving free-form grid");
        let request = Request::build("ProcessFreeFormGrid", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            self.preferences.write_xml(w, conn.kind)?;
            write_background_pov(w, &pov)?;
            grid.write_xml(w, DimsBlock::Omit)?;
            grid.write_dims_xml(w)?;
            Ok(())
        })?;
        let res = self.invoke(&request)?;
        let laid_out = Grid::from_xml(&res)?;

        // ProcessFreeFormGrid returns layout only.
        self.refresh(&laid_out)
    }

    /// Runs an MDX query. Essbase providers only.
    pub fn mdx_query(&self, mdx: &str) -> Result<Grid, SessionError> {
        let conn = self.attached()?;
        if conn.kind != ProviderKind::Essbase {
            return Err(SessionError::UnsupportedOperation {
                operation: "MDX query",
                provider: conn.kind,
            });
        }

        info!("Executing MDX query: {}", mdx);
        let request = Request::build("ExecuteQuery", |w| {
            w.text_element("sID", &[], &conn.session_id)?;
            self.preferences.write_xml(w, conn.kind)?;
            w.text_element("mdx", &[], mdx)?;
            Ok(())
        })?;
        let res = self.invoke(&request)?;
        Ok(Grid::from_xml(&res)?)
    }

    // ========================================================================
    // PLUMBING
    // ========================================================================

    /// Connected with an SSO token and a cube open.
    fn attached(&self) -> Result<&Connection, SessionError> {
        let conn = self
            .connection
            .as_ref()
            .filter(|c| c.sso.is_some())
            .ok_or(SessionError::NotConnected)?;
        if self.open_cube.is_none() {
            return Err(SessionError::NotAttached);
        }
        Ok(conn)
    }

    /// Posts `request` and returns the `res_<Method>` element of the reply.
    fn invoke(&self, request: &Request) -> Result<Element, SessionError> {
        let started = Instant::now();
        let body = self.transport.post(&self.config.provider_url, request.body())?;
        info!(
            "SmartView request {} completed in {:.1}s",
            request.method(),
            started.elapsed().as_secs_f64()
        );

        let doc = Element::parse(&body).map_err(|e| {
            error!("Unreadable response to SmartView method {}", request.method());
            debug!("Response was:\n{}", body);
            e
        })?;
        if let Some(res) = doc.find(&request.response_name()) {
            return Ok(res.clone());
        }

        error!("Error invoking SmartView method {}", request.method());
        debug!("Request was:\n{}", request.body());
        debug!("Response was:\n{}", body);

        match doc.find("exception") {
            Some(exception) => {
                let err = provider_exception(request.method(), exception);
                error!("An exception occurred in {}: {}", request.method(), err);
                Err(err)
            }
            None => {
                let text = doc.text();
                error!("Unexpected response from SmartView provider:\n{}", text);
                Err(SessionError::UnexpectedResponse {
                    method: request.method().to_string(),
                    body: text,
                })
            }
        }
    }
}

fn write_background_pov(w: &mut XmlWriter, pov: &Pov) -> Result<(), SessionError> {
    w.start("backgroundpov", &[])?;
    for (dimension, member) in pov.iter() {
        w.empty("dim", &[("name", dimension), ("pov", member)])?;
    }
    w.end("backgroundpov")?;
    Ok(())
}

fn provider_exception(method: &str, exception: &Element) -> SessionError {
    let attr = |name: &str| exception.attr(name).unwrap_or_default().to_string();
    SessionError::Provider {
        method: method.to_string(),
        code: attr("errcode"),
        native: attr("native"),
        kind: attr("type"),
        description: exception.find("desc").map(Element::text).unwrap_or_default(),
        details: exception.find("details").map(Element::text),
    }
}
