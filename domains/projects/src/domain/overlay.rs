//! ffmpeg text overlay for the rendered video
//!
//! The service does not re-encode video. It stores the `-vf` argument a
//! post-processing step would use to burn the script into the clip.

use crate::domain::entities::Script;

const BOX: &str = "fontcolor=white:box=1:boxcolor=black@0.5";

/// Escape text for a single-quoted drawtext value
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("'\\''"),
            ':' => out.push_str("\\:"),
            _ => out.push(c),
        }
    }
    out
}

/// Headline on top, bullets stacked mid-frame, call to action at the bottom
pub fn drawtext_filters(script: &Script) -> Vec<String> {
    let mut filters = Vec::with_capacity(script.bullets.len() + 2);

    filters.push(format!(
        "drawtext=text='{}':{}:fontsize=36:boxborderw=5:x=(w-text_w)/2:y=h/8",
        escape(&script.headline),
        BOX
    ));
    filters.extend(script.bullets.iter().enumerate().map(|(i, bullet)| {
        format!(
            "drawtext=text='• {}':{}:fontsize=24:boxborderw=3:x=w/8:y=(h/2)+{}",
            escape(bullet),
            BOX,
            i * 40
        )
    }));
    filters.push(format!(
        "drawtext=text='{}':{}:fontsize=32:boxborderw=4:x=(w-text_w)/2:y=h-h/8",
        escape(&script.cta),
        BOX
    ));

    filters
}

/// The complete `-vf "..."` argument
pub fn ffmpeg_text_command(script: &Script) -> String {
    format!("-vf \"{}\"", drawtext_filters(script).join(","))
}
