//
// Reads a robots.txt file (or stdin) and prints what was found in it as JSON.

use std::fs;
use std::io::{ self, Read, Write };
use std::path::PathBuf;

use anyhow::{ Context, Result };
use clap::Parser;
use tracing_subscriber::EnvFilter;

use robots_directives::{ parse_bytes, segment, tokenize };

#[derive(Parser, Debug)]
#[command(name = "robots2json", version, about = "Print the directives of a robots.txt file as JSON")]
struct Args {
    /// The robots.txt file to read, stdin when absent or `-`
    file: Option< PathBuf >,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,

    /// Only print the sitemap declarations
    #[arg(long, conflicts_with = "blocks")]
    sitemaps_only: bool,

    /// Print the key/value pairs of every block instead of the aggregated result
    #[arg(long)]
    blocks: bool,
}

fn read_input( file: Option< &PathBuf > ) -> Result< Vec< u8 > > {
    match file {
        Some( path ) if path.as_os_str( ) != "-" => {
            fs::read( path ).with_context( || format!( "failed to read {}", path.display( ) ) )
        }
        _ => {
            let mut buf = Vec::new( );
            io::stdin( ).read_to_end( &mut buf ).context( "failed to read stdin" )?;
            Ok( buf )
        }
    }
}

fn to_json< T: serde::Serialize >( value: &T, pretty: bool ) -> Result< String > {
    let json = if pretty {
        serde_json::to_string_pretty( value )?
    } else {
        serde_json::to_string( value )?
    };
    Ok( json )
}

fn main( ) -> Result< () > {
    tracing_subscriber::fmt( )
        .with_env_filter( EnvFilter::try_from_default_env( ).unwrap_or_else( | _ |{ EnvFilter::new( "warn" ) } ) )
        .with_writer( io::stderr )
        .init( );

    let args = Args::parse( );
    let bytes = read_input( args.file.as_ref( ) )?;
    let robots = parse_bytes( &bytes ).context( "could not decode robots.txt" )?;

    let json = if args.blocks {
        //NOTE: parse_bytes has already checked the encoding
        let text = String::from_utf8_lossy( &bytes );
        let text = text.trim_start_matches( '\u{feff}' );
        let blocks: Vec< _ > = segment( text ).iter( ).map( | block |{ tokenize( block ) } ).collect( );
        to_json( &blocks, args.pretty )?
    } else if args.sitemaps_only {
        to_json( &robots.sitemaps, args.pretty )?
    } else {
        to_json( &robots, args.pretty )?
    };

    let mut stdout = io::stdout( );
    writeln!( stdout, "{}", json ).context( "failed to write output" )?;
    Ok( () )
}
