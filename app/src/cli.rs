//! Command line options

use anyhow::{anyhow, bail, Context};
use highlight::HighlightMode;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: mathdoc [OPTIONS] [INPUT]

Renders a JSON document (a whole document, one section or an array of
sections) to HTML.
Reads standard input when INPUT is missing or \"-\".

Options:
  --expression          Treat the input as a single expression
  --settings <FILE>     JSON settings file
  --standalone          Wrap the output in a complete HTML document
  --highlight <ID>      Highlight every in-scope occurrence of an expression id
  --mode <MODE>         within-proof-node, entire-document or current-and-previous
  --proof-node <ID>     Proof node the reader is in
  --section <ID>        Section the reader is in
  --keys <K1,K2,..>     Replay highlight key presses after highlighting
  -h, --help            Print this help";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub input: Option<PathBuf>,
    pub expression: bool,
    pub settings: Option<PathBuf>,
    pub standalone: bool,
    pub highlight: Option<String>,
    pub mode: Option<HighlightMode>,
    pub proof_node: Option<String>,
    pub section: Option<String>,
    pub keys: Vec<String>,
    pub help: bool,
}

impl Options {
    pub fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut options = Options::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("{} expects a value", name))
            };
            match arg.as_str() {
                "-h" | "--help" => options.help = true,
                "--expression" => options.expression = true,
                "--standalone" => options.standalone = true,
                "--settings" => options.settings = Some(PathBuf::from(value("--settings")?)),
                "--highlight" => options.highlight = Some(value("--highlight")?),
                "--mode" => {
                    let mode = value("--mode")?;
                    options.mode = Some(
                        mode.parse::<HighlightMode>()
                            .with_context(|| format!("invalid --mode {}", mode))?,
                    );
                }
                "--proof-node" => options.proof_node = Some(value("--proof-node")?),
                "--section" => options.section = Some(value("--section")?),
                "--keys" => {
                    options.keys = value("--keys")?
                        .split(',')
                        .map(str::trim)
                        .filter(|k| !k.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "-" => options.input = None,
                flag if flag.starts_with("--") => bail!("unknown option {}", flag),
                path => {
                    if options.input.is_some() {
                        bail!("more than one input given");
                    }
                    options.input = Some(PathBuf::from(path));
                }
            }
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Options> {
        Options::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_full_command_line() {
        let options = parse(&[
            "doc.json",
            "--highlight",
            "e7",
            "--mode",
            "entire-document",
            "--proof-node",
            "p1",
            "--keys",
            "m, 1",
        ])
        .unwrap();
        assert_eq!(options.input, Some(PathBuf::from("doc.json")));
        assert_eq!(options.highlight.as_deref(), Some("e7"));
        assert_eq!(options.mode, Some(HighlightMode::EntireDocument));
        assert_eq!(options.proof_node.as_deref(), Some("p1"));
        assert_eq!(options.keys, vec!["m", "1"]);
    }

    #[test]
    fn test_defaults_read_stdin() {
        let options = parse(&[]).unwrap();
        assert_eq!(options.input, None);
        assert!(!options.expression);
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["--mode", "sideways"]).is_err());
        assert!(parse(&["--highlight"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
    }
}
