//! A permissive robots.txt tokenizer.
//!
//! The text is run through three stages, each of which only ever reads the output of the last:
//!
//! 1. [`segment`] splits the raw text into blocks anchored at `User-agent:` or `Sitemap:` lines,
//! 2. [`tokenize`] pulls the `key: value` pairs out of one block,
//! 3. [`aggregate`] folds the per-block pairs into a [`RobotsFile`].
//!
//! Nothing in the text is ever rejected. Lines that don't fit the grammar are dropped, so a garbage
//! file degrades to an empty [`RobotsFile`] rather than an error.
//!
//! ```
//! let robots = robots_directives::parse( "User-agent: *\nDisallow: /admin\n" );
//!
//! assert_eq!( robots.user_agent_rules[ 0 ].user_agents, vec![ "*" ] );
//! assert_eq!( robots.user_agent_rules[ 0 ].disallow, vec![ "/admin" ] );
//! ```

use std::convert::Infallible;
use std::str::FromStr;

use base_url::BaseUrl;
use base_url::TryFrom;
use serde::{ Deserialize, Serialize };
use thiserror::Error;
use tracing::debug;

mod aggregate;
mod directive;
mod parse;

pub use aggregate::aggregate;
pub use directive::tokenize;
pub use parse::segment;

/// A single `key: value` line pulled out of a block.
/// The key is always lowercase, the value is left exactly as it was written after the separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new< K: Into<String>, V: Into<String> >( key: K, value: V ) -> Self {
        KeyValue{
            key: key.into( ),
            value: value.into( ),
        }
    }
}

/// Every `User-agent`, `Allow` and `Disallow` value from one block, each list in the order the
/// lines were written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentRule {
    #[serde(rename = "user-agents", default)]
    pub user_agents: Vec< String >,
    #[serde(default)]
    pub allow: Vec< String >,
    #[serde(default)]
    pub disallow: Vec< String >,
}

/// The structured form of a robots.txt file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsFile {
    /// One rule per block holding a `user-agent`, `allow` or `disallow` key, in document order
    #[serde(rename = "user-agent-rules", default)]
    pub user_agent_rules: Vec< UserAgentRule >,
    /// Every `sitemap` value from every block, in document order and never deduplicated
    #[serde(default)]
    pub sitemaps: Vec< String >,
}

impl RobotsFile {

    pub fn is_empty( &self ) -> bool {
        self.user_agent_rules.is_empty( ) && self.sitemaps.is_empty( )
    }

    /// The sitemap declarations which are usable as absolute urls.
    /// Values which don't parse are skipped, the raw strings are still available in `sitemaps`.
    pub fn sitemap_urls( &self ) -> Vec< BaseUrl > {
        self.sitemaps.iter( ).filter_map( | sitemap |{
            match BaseUrl::try_from( sitemap.trim( ) ) {
                Ok( url ) => Some( url ),
                Err( _e ) => {
                    debug!( sitemap = sitemap.as_str( ), "skipping sitemap which is not a base url" );
                    None
                }
            }
        } ).collect( )
    }
}

impl FromStr for RobotsFile {
    type Err = Infallible;

    fn from_str( text: &str ) -> Result< Self, Self::Err > {
        Ok( parse( text ) )
    }
}

/// The only failure this crate knows about happens before parsing starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("robots.txt is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidEncoding { valid_up_to: usize },
}

/// Parse the text of a robots.txt file. This never fails, anything unrecognised is dropped.
pub fn parse( text: &str ) -> RobotsFile {
    parse::parse_text( text )
}

/// Parse a robots.txt file straight from the bytes it was served as.
///
/// A leading UTF-8 byte order mark is skipped. Bytes which aren't UTF-8 are the one thing that
/// can fail here, the parser itself still won't reject anything.
pub fn parse_bytes( bytes: &[u8] ) -> Result< RobotsFile, ParseError > {
    let bytes = bytes.strip_prefix( b"\xEF\xBB\xBF" ).unwrap_or( bytes );

    match std::str::from_utf8( bytes ) {
        Ok( text ) => Ok( parse( text ) ),
        Err( e ) => Err( ParseError::InvalidEncoding { valid_up_to: e.valid_up_to( ) } ),
    }
}

/***********
 * Unit Tests
 ******/
