/// Parser for Cobertura XML coverage reports.
///
/// Cobertura XML structure:
///   <coverage>
///     <sources><source>...</source></sources>
///     <packages>
///       <package name="...">
///         <classes>
///           <class name="..." filename="..." line-rate="...">
///             <methods>
///               <method name="...">
///                 <lines><line number="..." hits="..."/></lines>
///               </method>
///             </methods>
///             <lines>
///               <line number="..." hits="..." branch="true|false"/>
///             </lines>
///           </class>
///         </classes>
///       </package>
///     </packages>
///   </coverage>
///
/// Paths are kept exactly as written in `filename` so that two reports of
/// the same project, produced in different checkouts, line up by path.
use std::collections::HashMap;
use std::str;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{CovgateError, Result};
use crate::model::*;
use crate::parsers::Parser;

pub struct CoberturaParser;

impl Parser for CoberturaParser {
    fn parse(&self, input: &[u8]) -> Result<CoverageData> {
        parse_cobertura(input)
    }
}

/// Accumulates lines per file. Classes sharing a filename (e.g. Java inner
/// classes) merge into one file; a line listed twice keeps its max hits.
#[derive(Default)]
struct Collector {
    data: CoverageData,
    file_index: HashMap<String, usize>,
    line_index: Vec<HashMap<u32, usize>>,
}

impl Collector {
    fn open_file(&mut self, path: &str) -> usize {
        if let Some(&idx) = self.file_index.get(path) {
            return idx;
        }
        let idx = self.data.files.len();
        self.data.files.push(FileCoverage::new(path.to_string()));
        self.line_index.push(HashMap::new());
        self.file_index.insert(path.to_string(), idx);
        idx
    }

    fn record(&mut self, file: usize, line_number: u32, hit_count: u64) {
        let lines = &mut self.data.files[file].lines;
        let index = &mut self.line_index[file];
        if let Some(&idx) = index.get(&line_number) {
            let line = &mut lines[idx];
            line.hit_count = line.hit_count.max(hit_count);
        } else {
            index.insert(line_number, lines.len());
            lines.push(LineCoverage {
                line_number,
                hit_count,
            });
        }
    }

    fn finish(mut self) -> CoverageData {
        // Lines may have been collected from both <method> and <class> blocks.
        for file in &mut self.data.files {
            file.lines.sort_by_key(|l| l.line_number);
        }
        self.data
    }
}

fn parse_cobertura(input: &[u8]) -> Result<CoverageData> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut collector = Collector::default();
    let mut current_file: Option<usize> = None;
    let mut saw_root = false;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf);
        let is_start_event = matches!(&event, Ok(Event::Start(_)));
        match event {
            Err(e) => {
                return Err(CovgateError::Xml {
                    source: e,
                    position: reader.buffer_position(),
                })
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"coverage" => saw_root = true,
                b"class" => {
                    let attrs = attr_map(e);
                    let filename = attrs.get("filename").ok_or_else(|| {
                        CovgateError::Parse("<class> element without a filename".to_string())
                    })?;
                    let idx = collector.open_file(filename);
                    // A self-closing <class/> has no lines and no End event.
                    if is_start_event {
                        current_file = Some(idx);
                    }
                }
                b"line" => {
                    if let Some(file) = current_file {
                        let attrs = attr_map(e);
                        let line_number = parse_line_number(&attrs)?;
                        let hit_count = parse_hits(&attrs, line_number)?;
                        collector.record(file, line_number, hit_count);
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"class" {
                    current_file = None;
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(CovgateError::Parse(
            "not a Cobertura report: missing <coverage> root element".to_string(),
        ));
    }

    Ok(collector.finish())
}

fn parse_line_number(attrs: &HashMap<String, String>) -> Result<u32> {
    let raw = attrs
        .get("number")
        .ok_or_else(|| CovgateError::Parse("<line> element without a number".to_string()))?;
    let number: i64 = raw
        .trim()
        .parse()
        .map_err(|_| CovgateError::Parse(format!("invalid line number '{raw}'")))?;
    // Zero is left for the model to reject alongside duplicates.
    u32::try_from(number).map_err(|_| {
        CovgateError::MalformedInput(format!("line number {number} is out of range"))
    })
}

fn parse_hits(attrs: &HashMap<String, String>, line_number: u32) -> Result<u64> {
    match attrs.get("hits") {
        None => Ok(0),
        Some(raw) => raw.trim().parse().map_err(|_| {
            CovgateError::Parse(format!("invalid hit count '{raw}' on line {line_number}"))
        }),
    }
}

/// Extract attributes from an XML element into a HashMap.
fn attr_map(e: &quick_xml::events::BytesStart) -> HashMap<String, String> {
    e.attributes()
        .filter_map(|a| {
            let attr = a.ok()?;
            let key = str::from_utf8(attr.key.local_name().into_inner())
                .ok()?
                .to_string();
            let value = attr.unescape_value().ok()?.to_string();
            Some((key, value))
        })
        .collect()
}
