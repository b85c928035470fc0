//
// Folds the key/value pairs of every block into the final RobotsFile.

use tracing::debug;

use crate::{ KeyValue, RobotsFile, UserAgentRule };

const RULE_KEYS: [&str; 3] = [ "user-agent", "allow", "disallow" ];

fn values_for( pairs: &[KeyValue], key: &str ) -> Vec< String > {
    pairs.iter( )
         .filter( | kv |{ kv.key == key } )
         .map( | kv |{ kv.value.clone( ) } )
         .collect( )
}

fn has_rule_keys( pairs: &[KeyValue] ) -> bool {
    pairs.iter( ).any( | kv |{ RULE_KEYS.contains( &kv.key.as_str( ) ) } )
}

/// Build the [`RobotsFile`] from each block's pairs, blocks given in document order.
///
/// Every `sitemap` value goes into `sitemaps` no matter which block it sat in. A block holding any
/// of `user-agent`, `allow` or `disallow` becomes one [`UserAgentRule`] carrying all of that block's
/// values for those keys, whether or not the block named a user-agent. Nothing is deduplicated.
pub fn aggregate< I >( groups: I ) -> RobotsFile
    where I: IntoIterator< Item = Vec< KeyValue > >
{
    let mut robots = RobotsFile::default( );

    for pairs in groups {
        robots.sitemaps.extend( values_for( &pairs, "sitemap" ) );

        if has_rule_keys( &pairs ) {
            robots.user_agent_rules.push( UserAgentRule{
                user_agents: values_for( &pairs, "user-agent" ),
                allow: values_for( &pairs, "allow" ),
                disallow: values_for( &pairs, "disallow" ),
            } );
        }
    }

    debug!( rules = robots.user_agent_rules.len( ), sitemaps = robots.sitemaps.len( ),
            "aggregated robots.txt" );
    robots
}

/***********
 * Unit Tests
 ******/
#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kv( key: &str, value: &str ) -> KeyValue {
        KeyValue::new( key, value )
    }

    fn strings( values: &[&str] ) -> Vec< String > {
        values.iter( ).map( | v |{ v.to_string( ) } ).collect( )
    }

    #[test]
    fn sitemap_only_block_makes_no_rule( ) {
        let robots = aggregate( vec![ vec![ kv( "sitemap", "a" ), kv( "sitemap", "b" ) ] ] );

        assert!( robots.user_agent_rules.is_empty( ) );
        assert_eq!( robots.sitemaps, strings( &[ "a", "b" ] ) );
    }

    #[test]
    fn lone_disallow_still_makes_a_rule( ) {
        let robots = aggregate( vec![ vec![ kv( "disallow", "/private" ) ] ] );

        assert_eq!( robots.user_agent_rules, vec![ UserAgentRule{
            user_agents: Vec::new( ),
            allow: Vec::new( ),
            disallow: strings( &[ "/private" ] ),
        } ] );
    }

    #[test]
    fn block_contributes_to_both( ) {
        let robots = aggregate( vec![
            vec![ kv( "sitemap", "s1" ), kv( "user-agent", "a" ), kv( "disallow", "/x" ),
                  kv( "allow", "/x/y" ), kv( "user-agent", "b" ), kv( "disallow", "/x" ) ],
            vec![ kv( "crawl-delay", "5" ) ],
            vec![ kv( "user-agent", "c" ), kv( "sitemap", "s1" ) ],
        ] );

        assert_eq!( robots.user_agent_rules, vec![
            UserAgentRule{
                user_agents: strings( &[ "a", "b" ] ),
                allow: strings( &[ "/x/y" ] ),
                disallow: strings( &[ "/x", "/x" ] ),
            },
            UserAgentRule{
                user_agents: strings( &[ "c" ] ),
                ..UserAgentRule::default( )
            },
        ] );
        assert_eq!( robots.sitemaps, strings( &[ "s1", "s1" ] ) );
    }

    #[test]
    fn no_groups( ) {
        assert_eq!( aggregate( Vec::< Vec< KeyValue > >::new( ) ), RobotsFile::default( ) );
    }
}
