use crate::file_util::write_to_file;
use std::io;
use std::path::Path;

const STYLE: &str = r#"body{font-family:Arial,sans-serif;max-width:960px;margin:40px auto;padding:20px;background:#fafafa}
header{background:#2c3e50;color:white;padding:30px;text-align:center;border-radius:8px}
input{width:90%;max-width:500px;padding:14px;margin:20px auto;display:block;font-size:1.1em}
.entry{background:white;padding:20px;margin:20px 0;border-left:6px solid #e74c3c;border-radius:8px}
.phrase{display:inline-block;background:#e74c3c;color:white;padding:2px 8px;border-radius:4px;font-size:.9em}
blockquote{background:#ffebee;padding:15px;border-radius:6px;font-style:italic}
.empty{text-align:center;color:#777}"#;

// FINDINGS_HREF is replaced with a JSON string literal
const SCRIPT: &str = r#"const FINDINGS = FINDINGS_HREF;
function esc(v) {
  return String(v == null ? '' : v).replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));
}
function applyFilter() {
  const t = document.getElementById('filter').value.toLowerCase();
  document.querySelectorAll('.entry').forEach(e => {
    e.style.display = e.textContent.toLowerCase().includes(t) ? 'block' : 'none';
  });
}
fetch(FINDINGS + '?t=' + Date.now())
  .then(r => r.ok ? r.json() : [])
  .catch(() => [])
  .then(d => {
    const c = document.getElementById('results');
    if (!Array.isArray(d) || d.length === 0) {
      c.innerHTML = '<p class="empty">Noch keine Treffer.</p>';
      return;
    }
    c.innerHTML = d.slice().reverse().map(i =>
      `<div class="entry"><b>${esc(i.anwalt)}</b> • ${esc(i.kanzlei)} • ${esc(i.ort)}<br>
        <span class="phrase">${esc(i.phrase)}</span>
        <a href="${esc(i.quelle)}" target="_blank" rel="noopener">Wayback Machine</a> • ${esc(i.datum)}
        <blockquote>…${esc(i.context)}</blockquote></div>`
    ).join('');
    applyFilter();
  });
document.getElementById('filter').addEventListener('input', applyFilter);"#;

/// a JSON string literal that is safe inside a <script> block
fn js_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

/// the static report page. it holds no findings itself, it fetches
/// `findings_href` on load, newest first, with a client-side text filter
pub fn render(findings_href: &str, title: &str) -> String {
    let title = htmlescape::encode_minimal(title);
    let script = SCRIPT.replace("FINDINGS_HREF", &js_string(findings_href));

    format!(
        r#"<!DOCTYPE html>
<html lang="de"><head><meta charset="UTF-8"><title>{title}</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>{STYLE}</style>
</head><body>
<header><h1>{title}</h1><p>Öffentliche Quellen aus der Wayback Machine</p></header>
<input type="text" id="filter" placeholder="Suchen…" autocomplete="off">
<div id="results"><p class="empty">Lade Daten…</p></div>
<script>
{script}
</script>
</body></html>
"#
    )
}

pub fn write_report(path: &Path, html: &str) -> io::Result<()> {
    write_to_file(path, html)
}
