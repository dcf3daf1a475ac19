// args.rs - Command line arguments definition

use crate::formats::FormatRegistry;
use argh::FromArgs;

#[derive(FromArgs, Debug, Default)]
/// seqconvert - Convert between sequence file formats, optionally filtering
/// records with a JMESPath query
pub struct Args {
    /// split records into separate files, one per resulting item
    #[argh(switch, short = 's')]
    pub split: bool,

    /// print version and exit
    #[argh(switch, short = 'v')]
    pub version: bool,

    /// print a GFF3 summary of each record to stdout during conversion
    #[argh(switch, short = 'i')]
    pub info: bool,

    /// query (JMESPath) selecting or building records; the root is the list
    /// of input records
    #[argh(option, short = 'q')]
    pub query: Option<String>,

    /// residues per line for fasta output (default: 60)
    #[argh(option)]
    pub line_width: Option<usize>,

    /// source column for gff3/gtf output when a feature has none (default: seqconvert)
    #[argh(option)]
    pub gff_source: Option<String>,

    /// log level when RUST_LOG is unset: error, warn, info, debug, trace (default: warn)
    #[argh(option)]
    pub log_level: Option<String>,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,

    /// input_file input_type output_file output_type
    #[argh(positional)]
    pub paths: Vec<String>,
}

/// Usage text, including every accepted format token
pub fn usage(registry: &FormatRegistry) -> String {
    let mut text = format!(
        "Use: seqconvert [-s] [-v] [-i] [-q JMESPath] input_file input_type output_file output_type\n\
         \t-s Split records into separate files\n\
         \t-q JMESPath to select records. Must return a list of records. \
         Root is the list of input records.\n\
         \t-i Print out details of records during conversion\n\
         \t-v Print version and exit\n\
         \nValid types: {}\n\nFormats:\n",
        registry.valid_tokens().join(", ")
    );
    for (name, description) in registry.list_formats() {
        text.push_str(&format!("\t{:<16}{}\n", name, description));
    }
    text
}
