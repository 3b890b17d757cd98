//! FILENAME: tests/common/mod.rs
//! Test harness and canned provider responses for session integration tests.

#![allow(dead_code)]

use session::{Credentials, CubeView, Session, SessionConfig, Transport, TransportError};
use std::cell::RefCell;
use std::collections::VecDeque;
use wire::Element;

pub const PROVIDER_URL: &str = "http://provider.test/workspace/SmartViewProviders";

pub const CONNECT_HFM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<res_ConnectToProvider>
  <sID>HFM-SID-1</sID>
  <provider>Hyperion Financial Management</provider>
</res_ConnectToProvider>"#;

pub const CONNECT_ESSBASE: &str = r#"<res_ConnectToProvider>
  <sID>ESS-SID-1</sID>
  <provider>Analytic Services Provider</provider>
</res_ConnectToProvider>"#;

pub const OPEN_APPLICATION: &str = "<res_OpenApplication/>";
pub const SSO_TOKEN: &str = "<res_GetSSOToken><sso>SSO-TOKEN</sso></res_GetSSOToken>";
pub const OPEN_CUBE: &str = "<res_OpenCube/>";
pub const LOGOUT: &str = "<res_Logout/>";

pub const DEFAULT_POV: &str = r#"<res_GetDefaultPOV>
  <dims>Year|Market|Scenario</dims>
  <mbrs>2009|Total Markets|Actual</mbrs>
</res_GetDefaultPOV>"#;

pub const ENUM_DIMS: &str = r#"<res_EnumDims>
  <dimList>
    <dim id="2" name="Scenario"/>
    <dim id="0" name="Year"/>
    <dim id="1" name="Market"/>
  </dimList>
</res_EnumDims>"#;

pub const ENUM_FILTERS: &str = r#"<res_EnumFilters>
<filterList>
  <filter name="Hierarchy" id="0" compose="" decompose="">
    <arg id="0" name="top" type="str" prompt="Member"/>
  </filter>
  <filter name="Children" id="1" compose="(%0.CHILDREN)" decompose="^\((.+)\.CHILDREN\)$">
    <arg id="0" name="top" type="str" prompt="Member"/>
  </filter>
  <filter name="Descendants" id="3" compose="DESCENDANTS(%0)" decompose="^DESCENDANTS\( *(.+) *\)$">
    <arg id="0" name="top" type="str" prompt="Member"/>
  </filter>
</filterList>
</res_EnumFilters>"#;

pub const ENUM_MEMBERS: &str = "<res_EnumMembers><mbrs>East|West|South|</mbrs></res_EnumMembers>";

pub const FIND_MEMBER: &str = r#"<res_FindMember>
  <pathList>
    <path><mbrs>Total Markets|East|New York</mbrs></path>
    <path><mbrs>Total Markets|Shared|New York</mbrs></path>
  </pathList>
</res_FindMember>"#;

/// A provider-laid-out grid without data, as returned by ProcessFreeFormGrid.
pub const FREE_FORM_LAYOUT: &str = r#"<res_ProcessFreeFormGrid>
  <grid>
    <cube/>
    <dims>
      <dim id="0" name="Year" col="0"/>
      <dim id="1" name="Market" row="0"/>
      <dim id="2" name="Scenario" pov="Budget" display="Budget"/>
    </dims>
    <slices>
      <slice rows="3" cols="3">
        <data>
          <range start="0" end="8">
            <vals>|Qtr1|Qtr2|East|||West||</vals>
            <types>7|0|0|0|2|2|0|2|2</types>
          </range>
        </data>
      </slice>
    </slices>
  </grid>
</res_ProcessFreeFormGrid>"#;

pub const REFRESHED: &str = r#"<res_Refresh>
  <grid>
    <cube/>
    <dims>
      <dim id="0" name="Year" col="0"/>
      <dim id="1" name="Market" row="0"/>
      <dim id="2" name="Scenario" pov="Budget" display="Budget"/>
    </dims>
    <slices>
      <slice rows="3" cols="3">
        <data>
          <range start="0" end="8">
            <vals>|Qtr1|Qtr2|East|42.5||West|7|12</vals>
            <types>7|0|0|0|2|2|0|2|2</types>
          </range>
        </data>
      </slice>
    </slices>
  </grid>
</res_Refresh>"#;

pub fn exception(session_id: &str) -> String {
    format!(
        r#"<res_Error>
  <exception errcode="1000" native="-2147217873" type="0">
    <desc>The session is invalid</desc>
    <details>Session {} expired</details>
  </exception>
</res_Error>"#,
        session_id
    )
}

/// Transport that replays queued responses and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<String>>,
    requests: RefCell<Vec<(String, String)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: impl Into<String>) {
        self.responses.borrow_mut().push_back(response.into());
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Parsed body of the `index`th request.
    pub fn request(&self, index: usize) -> Element {
        Element::parse(&self.requests.borrow()[index].1).unwrap()
    }

    pub fn last_request(&self) -> Element {
        self.request(self.request_count() - 1)
    }

    /// Root element names of every request, in order.
    pub fn methods(&self) -> Vec<String> {
        (0..self.request_count())
            .map(|i| self.request(i).name().to_string())
            .collect()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(url, _)| url.clone()).collect()
    }
}

impl Transport for MockTransport {
    fn post(&self, url: &str, body: &str) -> Result<String, TransportError> {
        self.requests.borrow_mut().push((url.to_string(), body.to_string()));
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| TransportError::Other("no canned response left".to_string()))
    }
}

pub struct TestHarness {
    pub session: Session<MockTransport>,
}

impl TestHarness {
    pub fn new() -> Self {
        let session = Session::new(SessionConfig::new(PROVIDER_URL), MockTransport::new()).unwrap();
        TestHarness { session }
    }

    pub fn mock(&self) -> &MockTransport {
        self.session.transport()
    }

    pub fn push(&self, response: impl Into<String>) {
        self.mock().push(response);
    }

    /// Connected with a password and with a cube open.
    pub fn attached(connect_response: &str) -> (Self, CubeView) {
        let mut harness = Self::new();
        for response in [connect_response, OPEN_APPLICATION, SSO_TOKEN, OPEN_CUBE, DEFAULT_POV] {
            harness.push(response);
        }
        harness
            .session
            .connect(Credentials::password("admin", "secret"))
            .unwrap();
        let cube = harness.session.open_cube("localhost", "Sample", "Basic").unwrap();
        (harness, cube)
    }

    pub fn hfm() -> (Self, CubeView) {
        Self::attached(CONNECT_HFM)
    }

    pub fn essbase() -> (Self, CubeView) {
        Self::attached(CONNECT_ESSBASE)
    }
}
