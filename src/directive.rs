//
// Pulls `key: value` pairs out of a single block, one line at a time.

use tracing::trace;

use crate::KeyValue;

enum LineKind< 'a > {
    Directive( KeyValue ),
    Comment( &'a str ),
    Unknown( &'a str ),
}

fn is_key_char( c: char ) -> bool {
    c.is_ascii_alphanumeric( ) || c == '_' || c == '-'
}

fn classify( line: &str ) -> LineKind< '_ > {
    //NOTE: leading whitespace is the only garbage allowed in front of a key
    let line = line.trim_start( );

    let colon = match line.find( ':' ) {
        Some( i ) => i,
        None => return LineKind::Unknown( line ),
    };
    let ( key, rest ) = line.split_at( colon );

    if key.contains( '#' ) {
        return LineKind::Comment( line );
    }
    if key.is_empty( ) || !key.chars( ).all( is_key_char ) {
        return LineKind::Unknown( line );
    }

    //NOTE: the split character goes into rest, and at most one space or tab may follow it
    let rest = &rest[ 1.. ];
    let value = rest.strip_prefix( | c: char |( c == ' ' || c == '\t' ) ).unwrap_or( rest );

    LineKind::Directive( KeyValue::new( key.to_lowercase( ), value ) )
}

/// Extract the `key: value` pairs of one block in the order they were written.
///
/// Keys are lowercased. Comment lines and lines which don't have the shape of a directive are
/// dropped without complaint, so a block with nothing recognisable yields an empty `Vec`.
pub fn tokenize( block: &str ) -> Vec< KeyValue > {
    let mut pairs = Vec::new( );

    for line in block.lines( ) {
        match classify( line ) {
            LineKind::Directive( kv ) => pairs.push( kv ),
            LineKind::Comment( l ) => trace!( line = l, "dropping comment" ),
            LineKind::Unknown( l ) => {
                if !l.is_empty( ) {
                    trace!( line = l, "dropping line with no directive" );
                }
            }
        }
    }

    pairs
}

/***********
 * Unit Tests
 ******/
