use crate::bsky::service::Service;
use crate::clock::{Clock, DateTime, Utc};
use crate::http::{HTTPError, HTTPResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

/// Builds an unsigned JWT carrying the given claims.
pub fn jwt(claims: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"typ":"at+jwt","alg":"ES256K"}"#);
    let claims = URL_SAFE_NO_PAD.encode(claims);
    format!("{header}.{claims}.c2lnbmF0dXJl")
}

/// A 33-byte PNG header describing an image of the given size.
///
/// It isn't a complete image, but it is enough for anything that only
/// reads dimensions.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

/// A request received by a [`TestService`].
#[derive(Clone, Debug)]
pub struct Call {
    pub nsid: String,
    pub token: Option<String>,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Call {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

#[derive(Debug)]
enum Reply {
    Ok(String),
    Fail(StatusCode, String),
}

/// A service that answers each procedure with the contents of a file in
/// `tests/data` and remembers every request it receives.
///
/// Calling a procedure it was not told about panics.
#[derive(Debug)]
pub struct TestService {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<Call>>,
}

impl TestService {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers `nsid` successfully with `tests/data/<file>.json`.
    pub fn respond(mut self, nsid: &str, file: &str) -> Self {
        self.replies
            .insert(nsid.to_string(), Reply::Ok(file.to_string()));
        self
    }

    /// Answers `nsid` with `status` and `tests/data/<file>.json` as the body.
    pub fn fail(mut self, nsid: &str, status: StatusCode, file: &str) -> Self {
        self.replies
            .insert(nsid.to_string(), Reply::Fail(status, file.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn nsids(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.nsid).collect()
    }

    fn reply<R: DeserializeOwned>(&self, call: Call) -> HTTPResult<R> {
        let nsid = call.nsid.clone();
        self.calls.lock().unwrap().push(call);
        match self.replies.get(&nsid) {
            Some(Reply::Ok(file)) => {
                let body = load_data(file);
                serde_json::from_str(&body).map_err(|err| HTTPError::decode(err, &body))
            }
            Some(Reply::Fail(status, file)) => Err(HTTPError::from_status(*status, &load_data(file))),
            None => panic!("unexpected call to {nsid}"),
        }
    }
}

impl Service for TestService {
    async fn post_json<D, R>(&self, nsid: &str, token: Option<&str>, data: &D) -> HTTPResult<R>
    where
        D: Serialize + Sync,
        R: DeserializeOwned,
    {
        let body = serde_json::to_vec(data).map_err(HTTPError::Serialization)?;
        self.reply(Call {
            nsid: nsid.to_string(),
            token: token.map(String::from),
            content_type: String::from("application/json"),
            body,
        })
    }

    async fn post_bytes<R>(
        &self,
        nsid: &str,
        token: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> HTTPResult<R>
    where
        R: DeserializeOwned,
    {
        self.reply(Call {
            nsid: nsid.to_string(),
            token: Some(token.to_string()),
            content_type: content_type.to_string(),
            body: bytes,
        })
    }
}

pub struct FrozenClock {
    datetime: DateTime<Utc>,
}

impl FrozenClock {
    pub fn new(datetime: DateTime<Utc>) -> Self {
        FrozenClock { datetime }
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        let datetime = DateTime::parse_from_rfc3339("2025-05-23T10:13:00-07:00")
            .expect("invalid date supplied")
            .with_timezone(&Utc);
        Self::new(datetime)
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.datetime
    }
}
