//! Version information, captured at build time and served at runtime.
//!
//! A crate using this needs a build script calling [`build::generate`]:
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     scour_version::build::generate()
//! }
//! ```
//!
//! The [`version!`] macro then expands to a [`VersionInformation`] for the calling crate, which
//! can be mounted on an actix app using `version::configure(version!(), svc)`.
//!
//! **NOTE**: The macro must be called in the crate the version information should be generated for.

#[cfg(feature = "build")]
pub mod build;
#[cfg(feature = "actix-web")]
pub mod version;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct VersionInformation {
    pub name: String,
    pub version: Version,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Git::is_empty")]
    pub git: Git,
    pub build: Build,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Git {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub describe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl Git {
    pub fn is_empty(&self) -> bool {
        self.commit.is_none() && self.describe.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Build {
    pub timestamp: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Version {
    pub full: String,
    pub major: usize,
    pub minor: usize,
    pub patch: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<String>,
}

#[macro_export]
macro_rules! version {
    () => {
        $crate::VersionInformation {
            version: $crate::Version {
                full: env!("CARGO_PKG_VERSION").to_string(),
                major: env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or_default(),
                minor: env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or_default(),
                patch: env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or_default(),
                pre: option_env!("CARGO_PKG_VERSION_PRE")
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string),
            },

            name: env!("CARGO_PKG_NAME").into(),
            description: env!("CARGO_PKG_DESCRIPTION").into(),

            git: $crate::Git {
                describe: option_env!("VERGEN_GIT_DESCRIBE").map(ToString::to_string),
                commit: option_env!("VERGEN_GIT_SHA").map(ToString::to_string),
            },
            build: $crate::Build {
                timestamp: option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or_default().to_string(),
            },
        }
    };
}
