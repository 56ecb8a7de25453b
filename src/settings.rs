//! Application settings
//!
//! Read from a JSON file, every missing key falls back to its zero value

use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Port to listen on when the settings have none
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Settings errors
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be read
    #[error("Could not read settings from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid JSON for the settings
    #[error("Could not parse settings from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Structure of the settings file
#[allow(dead_code)] // not every section is used by the notes API
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Settings {
    pub asset: Asset,
    pub email: Email,
    pub form: Form,
    pub generation: Generation,
    #[serde(rename = "PostgreSQL")]
    pub postgresql: PostgreSQL,
    pub server: Server,
    pub session: Session,
    pub template: Template,
    pub view: View,

    /// Where the settings were loaded from
    #[serde(skip)]
    path: PathBuf,
}

impl Settings {
    /// Load the settings file
    ///
    /// # Errors
    ///
    /// Will return `Err` when the file is missing, unreadable or not valid JSON
    pub fn load<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        let contents = std::fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut settings =
            serde_json::from_slice::<Self>(&contents).map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.path = path.to_path_buf();

        Ok(settings)
    }

    /// Path of the loaded settings file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Static asset location
#[allow(dead_code)] // configures collaborators outside of the notes API
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Asset {
    pub folder: String,
}

/// Outgoing email account
#[allow(dead_code)] // configures collaborators outside of the notes API
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Email {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub from: String,
}

/// Form handling
#[allow(dead_code)] // configures collaborators outside of the notes API
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Form {
    pub file_storage_folder: String,
}

/// Code generation templates
#[allow(dead_code)] // configures collaborators outside of the notes API
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Generation {
    pub template_folder: String,
}

/// PostgreSQL connection
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PostgreSQL {
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    #[serde(rename = "SSLMode")]
    pub ssl_mode: bool,
}

impl PostgreSQL {
    /// Connection string for the database
    ///
    /// SSL is the default of the driver, only turning it off is explicit
    pub fn connection_string(&self) -> String {
        let mut connection_string = format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database,
        );

        if !self.ssl_mode {
            connection_string.push_str("?sslmode=disable");
        }

        connection_string
    }

    /// Is there a database to connect to
    pub fn is_configured(&self) -> bool {
        !self.hostname.is_empty()
    }
}

/// HTTP(S) server
#[allow(dead_code)] // not every section is used by the notes API
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Server {
    pub hostname: String,
    #[serde(rename = "UseHTTP")]
    pub use_http: bool,
    #[serde(rename = "UseHTTPS")]
    pub use_https: bool,
    #[serde(rename = "RedirectToHTTPS")]
    pub redirect_to_https: bool,
    #[serde(rename = "HTTPPort")]
    pub http_port: u16,
    #[serde(rename = "HTTPSPort")]
    pub https_port: u16,
    pub cert_file: String,
    pub key_file: String,
}

impl Server {
    /// Address to listen on for HTTP
    ///
    /// An empty or unparsable hostname listens on all interfaces
    pub fn address(&self) -> SocketAddr {
        let ip = self
            .hostname
            .parse::<IpAddr>()
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let port = if self.http_port == 0 {
            DEFAULT_HTTP_PORT
        } else {
            self.http_port
        };

        SocketAddr::new(ip, port)
    }
}

/// Cookie session
#[allow(dead_code)] // configures collaborators outside of the notes API
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Session {
    pub auth_key: String,
    pub encrypt_key: String,
    #[serde(rename = "CSRFKey")]
    pub csrf_key: String,
    pub name: String,
    pub options: SessionOptions,
}

/// Cookie options of the session
#[allow(dead_code)] // configures collaborators outside of the notes API
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SessionOptions {
    pub path: String,
    pub domain: String,
    pub max_age: i64,
    pub secure: bool,
    pub http_only: bool,
}

/// Base and child templates
#[allow(dead_code)] // configures collaborators outside of the notes API
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Template {
    pub root: String,
    pub children: Vec<String>,
}

/// View rendering
#[allow(dead_code)] // configures collaborators outside of the notes API
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct View {
    #[serde(rename = "BaseURI")]
    pub base_uri: String,
    pub extension: String,
    pub folder: String,
    pub caching: bool,
}
