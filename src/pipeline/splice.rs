//! Boilerplate splicing: insert margin, title, and header blocks at anchor
//! lines of the pandoc-generated LaTeX.
//!
//! This stage is brittle by design — it depends on the exact lines pandoc's
//! standalone template emits. All anchor lookups go through [`find_anchor`]
//! so a pandoc template change is a one-place fix, and a miss fails loudly
//! with [`Md2TexError::AnchorNotFound`] instead of silently producing a
//! document without a title.

use crate::error::Md2TexError;
use crate::pipeline::frontmatter::FrontMatter;

const BEGIN_DOCUMENT: &str = r"\begin{document}";
const DOCUMENT_CLASS: &str = r"\documentclass[]{article}";
const MARGIN_DIRECTIVE: &str = r"\usepackage[margin=1.25in]{geometry}";

/// Locate the first line equal to `anchor`.
fn find_anchor(lines: &[String], anchor: &str) -> Result<usize, Md2TexError> {
    lines
        .iter()
        .position(|line| line == anchor)
        .ok_or_else(|| Md2TexError::AnchorNotFound {
            anchor: anchor.to_string(),
        })
}

/// Insert `new_lines` at `index`, preserving their order.
fn insert_lines(lines: &mut Vec<String>, index: usize, new_lines: &[String]) {
    for line in new_lines.iter().rev() {
        lines.insert(index, line.clone());
    }
}

/// Insert the geometry margin directive after the `\documentclass` line.
///
/// Pandoc emits `\documentclass[]{article}` on one line, but wraps the
/// options block across two lines when class options are present; both
/// shapes are handled.
pub fn add_margins(lines: &mut Vec<String>) -> Result<(), Md2TexError> {
    let index = match find_anchor(lines, DOCUMENT_CLASS) {
        Ok(index) => index,
        Err(_) => {
            let start = find_anchor(lines, r"\documentclass[")?;
            if lines.get(start + 1).map(String::as_str) == Some(r"]{article}") {
                start + 1
            } else {
                return Err(Md2TexError::AnchorNotFound {
                    anchor: DOCUMENT_CLASS.to_string(),
                });
            }
        }
    };
    lines.insert(index + 1, MARGIN_DIRECTIVE.to_string());
    Ok(())
}

/// Insert the title block and table of contents around `\begin{document}`.
pub fn add_title_and_toc(
    lines: &mut Vec<String>,
    front_matter: &FrontMatter,
    manufacturer: &str,
) -> Result<(), Md2TexError> {
    let title = front_matter.title()?;
    let id = front_matter.id()?;
    let index = find_anchor(lines, BEGIN_DOCUMENT)?;

    insert_lines(
        lines,
        index + 1,
        &[
            r"\maketitle".to_string(),
            r"\thispagestyle{empty}".to_string(),
            r"\tableofcontents".to_string(),
            r"\pagebreak".to_string(),
        ],
    );
    insert_lines(
        lines,
        index,
        &[
            format!(r"\title{{{title} \\ "),
            format!(r"\large {id}{}}}", revision_str(front_matter.revision())),
            r"\date{\today}".to_string(),
            format!(r"\author{{{manufacturer}}}"),
        ],
    );
    Ok(())
}

/// Insert the fancyhdr header/footer preamble around `\begin{document}`.
///
/// Left header carries the title, right header the id and revision, and the
/// footer a "Page N of M" counter via the lastpage package.
pub fn add_header_and_footer(
    lines: &mut Vec<String>,
    front_matter: &FrontMatter,
) -> Result<(), Md2TexError> {
    let title = front_matter.title()?;
    let id = front_matter.id()?;
    let index = find_anchor(lines, BEGIN_DOCUMENT)?;

    insert_lines(lines, index + 1, &[r"\thispagestyle{empty}".to_string()]);
    insert_lines(
        lines,
        index,
        &[
            r"\usepackage{fancyhdr}".to_string(),
            r"\usepackage{lastpage}".to_string(),
            r"\pagestyle{fancy}".to_string(),
            format!(r"\lhead{{{title}}}"),
            format!(r"\rhead{{{id}{}}}", revision_str(front_matter.revision())),
            r"\cfoot{Page \thepage\ of \pageref{LastPage}}".to_string(),
        ],
    );
    Ok(())
}

/// Render the revision suffix: `", Rev. 2"` when present, empty otherwise.
fn revision_str(revision: Option<String>) -> String {
    match revision {
        Some(rev) => format!(", Rev. {rev}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::frontmatter;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn front_matter(yaml: &str) -> FrontMatter {
        let doc = format!("---\n{yaml}---\nbody\n");
        frontmatter::extract(&doc).unwrap().1
    }

    fn minimal_latex() -> Vec<String> {
        lines(&[
            r"\documentclass[]{article}",
            r"\usepackage{amsmath}",
            r"\begin{document}",
            "Hello.",
            r"\end{document}",
        ])
    }

    #[test]
    fn margins_inserted_after_documentclass() {
        let mut tex = minimal_latex();
        add_margins(&mut tex).unwrap();
        assert_eq!(tex[1], MARGIN_DIRECTIVE);
    }

    #[test]
    fn margins_handle_wrapped_documentclass() {
        let mut tex = lines(&[
            r"\documentclass[",
            r"]{article}",
            r"\begin{document}",
            r"\end{document}",
        ]);
        add_margins(&mut tex).unwrap();
        assert_eq!(tex[2], MARGIN_DIRECTIVE);
    }

    #[test]
    fn margins_fail_without_documentclass() {
        let mut tex = lines(&[r"\begin{document}", r"\end{document}"]);
        let err = add_margins(&mut tex).unwrap_err();
        assert!(matches!(err, Md2TexError::AnchorNotFound { .. }));
    }

    #[test]
    fn title_block_order_around_begin_document() {
        let fm = front_matter("title: \"Doc\"\nid: \"DOC-1\"\nrevision: 2\n");
        let mut tex = minimal_latex();
        add_title_and_toc(&mut tex, &fm, "Acme").unwrap();

        let joined = tex.join("\n");
        let title_pos = joined.find(r"\title{Doc \\ ").unwrap();
        let begin_pos = joined.find(r"\begin{document}").unwrap();
        let maketitle_pos = joined.find(r"\maketitle").unwrap();
        assert!(title_pos < begin_pos && begin_pos < maketitle_pos);
        assert!(joined.contains(r"\large DOC-1, Rev. 2}"));
        assert!(joined.contains(r"\author{Acme}"));
        assert!(joined.contains(r"\tableofcontents"));
    }

    #[test]
    fn title_block_fails_on_missing_id() {
        let fm = front_matter("title: \"Doc\"\n");
        let mut tex = minimal_latex();
        let err = add_title_and_toc(&mut tex, &fm, "Acme").unwrap_err();
        assert!(matches!(
            err,
            Md2TexError::MissingFrontMatterKey { key: "id" }
        ));
    }

    #[test]
    fn header_contains_title_id_and_revision() {
        let fm = front_matter("title: \"Doc\"\nid: \"DOC-1\"\nrevision: 2\n");
        let mut tex = minimal_latex();
        add_header_and_footer(&mut tex, &fm).unwrap();

        let joined = tex.join("\n");
        assert!(joined.contains(r"\lhead{Doc}"));
        assert!(joined.contains(r"\rhead{DOC-1, Rev. 2}"));
        assert!(joined.contains(r"\cfoot{Page \thepage\ of \pageref{LastPage}}"));
    }

    #[test]
    fn header_omits_revision_when_absent() {
        let fm = front_matter("title: \"Doc\"\nid: \"DOC-1\"\n");
        let mut tex = minimal_latex();
        add_header_and_footer(&mut tex, &fm).unwrap();
        assert!(tex.join("\n").contains(r"\rhead{DOC-1}"));
    }

    #[test]
    fn splice_fails_without_begin_document() {
        let fm = front_matter("title: \"Doc\"\nid: \"DOC-1\"\n");
        let mut tex = lines(&[r"\documentclass[]{article}"]);
        let err = add_header_and_footer(&mut tex, &fm).unwrap_err();
        assert!(matches!(err, Md2TexError::AnchorNotFound { .. }));
    }

    #[test]
    fn revision_suffix_formats() {
        assert_eq!(revision_str(Some("2".into())), ", Rev. 2");
        assert_eq!(revision_str(None), "");
    }
}
