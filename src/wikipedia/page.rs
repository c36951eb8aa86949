use crate::language::LanguageCode;

/// A Wikipedia article in one edition.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub language: LanguageCode,
    /// Title as reported by the API, after normalisation and redirects.
    pub title: String,
    pub exists: bool,
    /// Lead text before the first heading.
    pub summary: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    /// Heading depth: 2 for `== … ==`, 3 for `=== … ===`, and so on.
    pub level: usize,
    /// Text directly under this heading, excluding subsections.
    pub text: String,
    pub sections: Vec<Section>,
}

impl Page {
    pub fn missing(language: LanguageCode, title: impl Into<String>) -> Self {
        Self {
            language,
            title: title.into(),
            exists: false,
            summary: String::new(),
            sections: Vec::new(),
        }
    }

    /// Builds a page from a plain-text extract fetched with `exsectionformat=wiki`.
    pub fn from_extract(language: LanguageCode, title: impl Into<String>, extract: &str) -> Self {
        let (summary, sections) = parse_extract(extract);
        Self {
            language,
            title: title.into(),
            exists: true,
            summary,
            sections,
        }
    }

    /// Every section titled exactly `title`, depth-first.
    pub fn sections_by_title(&self, title: &str) -> Vec<&Section> {
        let mut found = Vec::new();
        for section in &self.sections {
            section.collect_titled(title, &mut found);
        }
        found
    }

    /// Last section titled exactly `title`, if any.
    pub fn section_by_title(&self, title: &str) -> Option<&Section> {
        self.sections_by_title(title).pop()
    }

    /// Summary followed by every section with its heading.
    pub fn text(&self) -> String {
        let mut out = String::new();
        if !self.summary.is_empty() {
            out.push_str(&self.summary);
            out.push_str("\n\n");
        }
        for section in &self.sections {
            section.render(&mut out);
        }
        out.trim().to_string()
    }
}

impl Section {
    /// Heading, own text and all nested subsections.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out.trim().to_string()
    }

    fn render(&self, out: &mut String) {
        out.push_str(&self.title);
        out.push('\n');
        if !self.text.is_empty() {
            out.push_str(&self.text);
            out.push_str("\n\n");
        }
        for sub in &self.sections {
            sub.render(out);
        }
    }

    fn collect_titled<'a>(&'a self, title: &str, found: &mut Vec<&'a Section>) {
        if self.title == title {
            found.push(self);
        }
        for sub in &self.sections {
            sub.collect_titled(title, found);
        }
    }
}

/// Splits a wiki-format extract into lead text and a section tree.
pub(crate) fn parse_extract(extract: &str) -> (String, Vec<Section>) {
    let mut summary = Vec::new();
    let mut flat: Vec<(Section, Vec<&str>)> = Vec::new();

    for line in extract.lines() {
        match parse_heading(line) {
            Some((level, title)) => flat.push((
                Section {
                    title: title.to_string(),
                    level,
                    text: String::new(),
                    sections: Vec::new(),
                },
                Vec::new(),
            )),
            None => match flat.last_mut() {
                Some((_, body)) => body.push(line),
                None => summary.push(line),
            },
        }
    }

    let flat = flat.into_iter().map(|(mut section, body)| {
        section.text = body.join("\n").trim().to_string();
        section
    });
    (summary.join("\n").trim().to_string(), nest(flat))
}

/// `== Title ==` → `(2, "Title")`. Unbalanced or empty headings are plain text.
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim();
    let level = line.bytes().take_while(|&b| b == b'=').count();
    if level < 2 || line.len() <= level * 2 {
        return None;
    }
    let trailing = line.bytes().rev().take_while(|&b| b == b'=').count();
    if trailing != level {
        return None;
    }
    let title = line[level..line.len() - level].trim();
    (!title.is_empty()).then_some((level, title))
}

fn nest(flat: impl IntoIterator<Item = Section>) -> Vec<Section> {
    let mut roots = Vec::new();
    let mut open: Vec<Section> = Vec::new();

    for section in flat {
        while open.last().is_some_and(|top| top.level >= section.level) {
            if let Some(done) = open.pop() {
                attach(&mut open, &mut roots, done);
            }
        }
        open.push(section);
    }
    while let Some(done) = open.pop() {
        attach(&mut open, &mut roots, done);
    }
    roots
}

fn attach(open: &mut [Section], roots: &mut Vec<Section>, done: Section) {
    match open.last_mut() {
        Some(parent) => parent.sections.push(done),
        None => roots.push(done),
    }
}
