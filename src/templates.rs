//! Sample documents for testing and demonstration.
//!
//! Each sample exercises different supported elements and styles.

/// Markdown feature tour: headings, emphasis, links, lists, tables, an
/// image, and an embedded HTML block.
pub fn sample_markdown() -> &'static str {
    r##"# Release Notes

A quick tour of everything the converter understands, written in plain
Markdown.

## Text

Paragraphs support **bold**, *italic*, and ~~retracted~~ runs, plus
[links to the docs](https://example.com/docs).

## Lists

Work items for the week:

1. Triage open issues
2. Cut the release branch
3. Update the changelog

Unordered notes:

- Remember the migration guide
- Ping the design team

## Tables

| Component | Status |
| --------- | ------ |
| Parser    | stable |
| Converter | beta   |

## Media

![Quarterly revenue chart](https://example.com/chart.png)

## Embedded HTML

Raw HTML passes straight through to the converter:

<p style="color: #2b6cb0; margin: 0px 5px 0px 10px">
    Styled paragraphs keep their <b>inline</b> markup.
</p>
"##
}

/// HTML sample with classes, inline styles, a list, a table, and an image.
pub fn sample_html() -> &'static str {
    r##"
<h1 style="color: #1a365d">Quarterly Report</h1>
<p class="lead">Q4 summary for the <a href="https://example.com/team">platform team</a>.</p>
<p>
    Revenue grew by <b>23%</b> year over year, with
    <span style="color: rgb(229, 62, 62)">two regressions</span> still open.
</p>
<ul>
    <li>Customer acquisition cost reduced by 15%</li>
    <li>Net promoter score improved to 72</li>
</ul>
<table>
    <tr><th>Segment</th><th>Revenue</th></tr>
    <tr><td>Enterprise</td><td>$2.1M</td></tr>
    <tr><td>Mid-Market</td><td>$1.4M</td></tr>
</table>
<img src="https://example.com/chart.png" width="320" height="180" />
"##
}

/// Minimal sample for unit testing.
pub fn minimal_markdown() -> &'static str {
    r#"# Title

Body text"#
}
