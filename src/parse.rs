//
// Block segmentation and the pipeline which runs the three stages in order.

use tracing::{ debug, trace };

use crate::aggregate::aggregate;
use crate::directive::tokenize;
use crate::RobotsFile;

const ANCHORS: [&str; 2] = [ "user-agent:", "sitemap:" ];

enum Line {
    Anchor,
    Blank,
    Other,
}

fn starts_with_ignore_case( line: &str, prefix: &str ) -> bool {
    //NOTE: get() refuses to split a multi-byte character, which is exactly a mismatch
    match line.get( ..prefix.len( ) ) {
        Some( head ) => head.eq_ignore_ascii_case( prefix ),
        None => false,
    }
}

fn classify( line: &str ) -> Line {
    if line.is_empty( ) {
        return Line::Blank;
    }

    let trimmed = line.trim_start( );
    if ANCHORS.iter( ).any( | anchor |{ starts_with_ignore_case( trimmed, anchor ) } ) {
        Line::Anchor
    } else {
        Line::Other
    }
}

/// Undo the escaping some servers apply to robots.txt files.
/// A literal `\n` becomes a line break and carriage returns, literal or real, are dropped.
fn unescape( block: &str ) -> String {
    block.replace( "\\n", "\n" )
         .replace( "\\r", "" )
         .replace( '\r', "" )
}

enum State< 'a > {
    Outside( Vec< String > ), //Between blocks, everything here is discarded
    Inside( Vec< String >, Vec< &'a str > ), //Collecting the lines of a block that began at an anchor
}

impl< 'a > State< 'a > {

    fn anchor_line( self, line: &'a str ) -> Self {
        trace!( line, "block anchor" );

        match self {
            State::Outside( blocks ) => State::Inside( blocks, vec![ line ] ),
            //NOTE: an anchor inside a block doesn't start a new one, only a blank line ends a block
            State::Inside( blocks, mut lines ) => {
                lines.push( line );
                State::Inside( blocks, lines )
            }
        }
    }

    fn blank_line( self ) -> Self {

        match self {
            State::Outside( blocks ) => State::Outside( blocks ),
            State::Inside( mut blocks, lines ) => {
                blocks.push( unescape( &lines.join( "\n" ) ) );
                State::Outside( blocks )
            }
        }
    }

    fn other_line( self, line: &'a str ) -> Self {

        match self {
            State::Outside( blocks ) => {
                trace!( line, "discarding line outside of any block" );
                State::Outside( blocks )
            }
            State::Inside( blocks, mut lines ) => {
                lines.push( line );
                State::Inside( blocks, lines )
            }
        }
    }

    fn eof( self ) -> Vec< String > {

        match self {
            State::Outside( blocks ) => blocks,
            //HACK: no blank line followed the anchor so no block can span lines, every anchor we
            // collected is a block of its own and whatever sat between them is lost
            State::Inside( mut blocks, lines ) => {
                for line in lines {
                    if let Line::Anchor = classify( line ) {
                        blocks.push( unescape( line ) );
                    }
                }
                blocks
            }
        }
    }
}

/// Split the raw text into blocks, each beginning at a `User-agent:` or `Sitemap:` line.
///
/// A block runs until the next blank line. If there is no blank line anywhere after the anchor the
/// block is only the anchor line itself. Text outside of every block is discarded.
pub fn segment( text: &str ) -> Vec< String > {
    //NOTE: the extra newline turns a trailing newline into a blank line, closing the last block
    let text = format!( "{}\n", text );
    let mut state = State::Outside( Vec::new( ) );

    for line in text.lines( ) {
        state = match classify( line ) {
            Line::Anchor => state.anchor_line( line ),
            Line::Blank => state.blank_line( ),
            Line::Other => state.other_line( line ),
        };
    }

    let blocks = state.eof( );
    debug!( blocks = blocks.len( ), "segmented robots.txt" );
    blocks
}

pub fn parse_text( text: &str ) -> RobotsFile {
    let groups: Vec< _ > = segment( text ).iter( )
        .map( | block |{ tokenize( block ) } )
        .filter( | pairs |{ !pairs.is_empty( ) } )
        .collect( );

    aggregate( groups )
}

/***********
 * Unit Tests
 ******/
#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /***********
     * Line classification
     ******/
    #[rstest]
    #[case( "User-agent: *" )]
    #[case( "USER-AGENT:*" )]
    #[case( "  \tuser-agent: bot" )]
    #[case( "Sitemap: https://example.com/s.xml" )]
    #[case( "sitemap:" )]
    fn anchor_lines( #[case] line: &str ) {
        assert!( matches!( classify( line ), Line::Anchor ) );
    }

    #[rstest]
    #[case( "Disallow: /" )]
    #[case( "# User-agent: *" )]
    #[case( "User-agent *" )]
    #[case( "X-User-agent: *" )]
    #[case( "   " )]
    #[case( "ü" )]
    fn other_lines( #[case] line: &str ) {
        assert!( matches!( classify( line ), Line::Other ) );
    }

    /***********
     * Segmentation
     ******/
    #[test]
    fn no_anchor_no_blocks( ) {
        assert!( segment( "" ).is_empty( ) );
        assert!( segment( "# just a comment\nDisallow: /\n\n" ).is_empty( ) );
    }

    #[test]
    fn blank_line_ends_block( ) {
        let text = "# header\nUser-agent: a\nDisallow: /x\n\n\nUser-agent: b\nDisallow: /y\n";

        assert_eq!( segment( text ), vec![ "User-agent: a\nDisallow: /x",
                                           "User-agent: b\nDisallow: /y" ] );
    }

    #[test]
    fn anchor_without_blank_line_stands_alone( ) {
        let text = "User-agent: a\nDisallow: /x\nUser-agent: b\nDisallow: /y";

        assert_eq!( segment( text ), vec![ "User-agent: a", "User-agent: b" ] );
    }

    #[test]
    fn anchors_inside_a_block_stay_in_it( ) {
        let text = "User-agent: a\nUser-agent: b\nDisallow: /\nSitemap: s\n";

        assert_eq!( segment( text ), vec![ "User-agent: a\nUser-agent: b\nDisallow: /\nSitemap: s" ] );
    }

    #[test]
    fn whitespace_only_line_is_not_blank( ) {
        let text = "User-agent: a\n  \nDisallow: /x\n";

        assert_eq!( segment( text ), vec![ "User-agent: a\n  \nDisallow: /x" ] );
    }

    #[test]
    fn carriage_returns_and_escapes( ) {
        let text = "User-agent: a\r\nDisallow: /x\\nAllow: /y\\r\r\n\r\nSitemap: s\r\n";

        assert_eq!( segment( text ), vec![ "User-agent: a\nDisallow: /x\nAllow: /y",
                                           "Sitemap: s" ] );
    }
}
