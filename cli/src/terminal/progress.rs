use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const BAR_TEMPLATE: &str =
    "{spinner:.blue} {msg} [{bar:32.green/bright_black}] {pos}/{len} hosts ({elapsed})";

/// Attaches a host counter bar to `span`.
///
/// Only spans created with `indicatif.pb_show = true` render one.
pub fn attach_scan_bar(span: &Span, total: usize) -> anyhow::Result<()> {
    let style = ProgressStyle::with_template(BAR_TEMPLATE)?
        .progress_chars("█▆▁")
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    span.pb_set_style(&style);
    span.pb_set_length(total as u64);
    span.pb_set_message("Scanning");
    Ok(())
}

pub fn host_done(span: &Span) {
    span.pb_inc(1);
}
