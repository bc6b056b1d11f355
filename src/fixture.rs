//! XML test fixtures: an obfuscated trace, its mapping and the expected
//! retraced output.
//!
//! ```xml
//! <test name="InlineSourceFileStackTrace" expectedWarnings="0">
//!   <obfuscated><line>\tat a.b(SourceFile:1)</line></obfuscated>
//!   <mapping><line>com.Foo -&gt; a:</line></mapping>
//!   <retraced><line>\tat com.Foo.b(Foo.java:1)</line></retraced>
//!   <retracedVerbose>...</retracedVerbose>
//! </test>
//! ```
//!
//! Each section holds one `<line>` element per line. Lines may use the XML
//! entities `&quot; &lt; &gt; &amp;` and the escapes `\t` and `\n`.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::FixtureError;
use crate::retrace::Retracer;

static TEST_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<test\s+name="([^"]+)"\s+expectedWarnings="(\d+)""#).expect("valid test element regex")
});

static LINE_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<line>(.*?)</line>").expect("valid line element regex"));

/// A parsed fixture. Missing sections are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub name: String,
    pub expected_warnings: u32,
    pub obfuscated: String,
    pub mapping: String,
    pub retraced: String,
    pub retraced_verbose: String,
}

/// The result of running a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureOutcome {
    pub name: String,
    pub expected: String,
    pub actual: String,
}

impl FixtureOutcome {
    pub fn passed(&self) -> bool {
        normalize(&self.expected) == normalize(&self.actual)
    }
}

impl Fixture {
    /// Parse a fixture document.
    pub fn parse_xml(xml: &str) -> Result<Self, FixtureError> {
        let test = TEST_ELEMENT
            .captures(xml)
            .ok_or(FixtureError::MissingTestElement)?;

        Ok(Self {
            name: test[1].to_string(),
            expected_warnings: test[2].parse().unwrap_or(u32::MAX),
            obfuscated: section(xml, "obfuscated"),
            mapping: section(xml, "mapping"),
            retraced: section(xml, "retraced"),
            retraced_verbose: section(xml, "retracedVerbose"),
        })
    }

    /// Read and parse a fixture file.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let xml = fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_xml(&xml)
    }

    /// The output this fixture expects. Verbose runs fall back to the plain
    /// expectation when the fixture has no verbose one.
    pub fn expected(&self, verbose: bool) -> &str {
        if verbose && !self.retraced_verbose.is_empty() {
            &self.retraced_verbose
        } else {
            &self.retraced
        }
    }

    /// Retrace the obfuscated section and compare it with the expectation.
    pub fn check(&self, verbose: bool) -> FixtureOutcome {
        let actual = Retracer::with_verbose(verbose).retrace(&self.obfuscated, &self.mapping);
        FixtureOutcome {
            name: self.name.clone(),
            expected: self.expected(verbose).to_string(),
            actual,
        }
    }
}

/// The joined, decoded lines of a section.
fn section(xml: &str, name: &str) -> String {
    let open = format!("<{}>", name);
    let close = format!("</{}>", name);

    let Some(start) = xml.find(&open).map(|index| index + open.len()) else {
        return String::new();
    };
    let Some(length) = xml[start..].find(&close) else {
        return String::new();
    };

    LINE_ELEMENT
        .captures_iter(&xml[start..start + length])
        .map(|line| decode(&line[1]))
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode(line: &str) -> String {
    line.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("\\t", "\t")
        .replace("\\n", "\n")
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").trim().to_string()
}
