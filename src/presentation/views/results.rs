use std::fmt::Write;

use crate::application::services::SongRecommendation;

/// Results page for `POST /generate_songs`.
pub fn render_results(recommendation: &SongRecommendation) -> String {
    let mut body = String::new();

    if let Some(error) = &recommendation.error {
        let _ = writeln!(
            body,
            r#"      <p class="error" role="alert">{}</p>"#,
            escape_html(error)
        );
    }

    if recommendation.songs.is_empty() {
        if recommendation.error.is_none() {
            body.push_str("      <p class=\"empty\">No songs found for this mood.</p>\n");
        }
    } else {
        body.push_str("      <ol class=\"songs\">\n");
        for song in recommendation.songs.iter() {
            let _ = writeln!(body, "        <li>{}</li>", escape_html(song));
        }
        body.push_str("      </ol>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>MoodTune - {mood}</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
            margin: 0;
        }}
        main {{
            max-width: 720px;
            margin: 40px auto;
            padding: 0 20px;
        }}
        h1 {{
            color: #4a9eff;
        }}
        .mood {{
            color: #ffb347;
        }}
        .error {{
            background-color: #3a1f1f;
            border: 1px solid #a33;
            padding: 10px 14px;
            border-radius: 6px;
        }}
        .songs li {{
            padding: 6px 0;
            border-bottom: 1px solid #2a2a2a;
        }}
        a {{
            color: #4a9eff;
        }}
    </style>
</head>
<body>
    <main>
      <h1>Songs for your mood: <span class="mood">{mood}</span></h1>
{body}      <p><a href="/">Try another mood</a></p>
    </main>
</body>
</html>
"#,
        mood = escape_html(&recommendation.mood),
        body = body,
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
