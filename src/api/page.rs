//! The widget page
//!
//! A thin renderer: it copies [`WidgetView`](crate::view::WidgetView) fields
//! from `snapshot` events into the DOM, posts button clicks back, and plays
//! `cue` events on one reusable audio element per sound.

pub const PAGE: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Pomodoro</title>
<style>
  body { margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center;
         background: #0a0a0a; color: #fff; font-family: system-ui, sans-serif; }
  #root { display: flex; flex-direction: column; gap: .5rem; width: 22rem; padding: 1rem;
          border: 4px solid #16a34a; border-radius: .75rem; }
  #root.red { border-color: #b91c1c; }
  #root.blue { border-color: #60a5fa; }
  .card { background: #171717; border-radius: .5rem; padding: 1rem; text-align: center; }
  #countdown { font-size: 5rem; letter-spacing: -.05em; margin: 1.5rem 0; }
  #title { background: transparent; border: 0; outline: none; color: #fff; width: 100%;
           font-size: 1.5rem; font-weight: bold; text-align: center; }
  #root.red #title { color: #dc2626; }
  #status { font-size: 1.5rem; font-weight: bold; color: #60a5fa; }
  button { display: block; width: 100%; margin-top: .5rem; padding: .5rem 1rem; border: 0;
           border-radius: .25rem; color: #fff; font-size: 1.1rem; cursor: pointer; }
  button.start { background: #16a34a; } button.pause, button.resume { background: #dc2626; }
  button.rest { background: #1d4ed8; }
  table { width: 100%; } td { width: 50%; padding: .5rem .75rem; }
  td:first-child { text-align: right; } td:last-child { text-align: left; }
  [hidden] { display: none !important; }
</style>
</head>
<body>
<div id="root">
  <div class="card">
    <div id="prompt"></div>
    <input id="title" type="text" placeholder="e.g. studying">
    <div id="status" hidden></div>
  </div>
  <div class="card">
    <div id="countdown">--:--</div>
    <div id="controls"></div>
  </div>
  <div class="card"><table><tbody id="stats"></tbody></table></div>
</div>
<script>
const sounds = {};
function play(path) {
  const audio = sounds[path] || (sounds[path] = new Audio(path));
  audio.currentTime = 0;
  audio.play().catch(() => {});
}

const title = document.getElementById('title');
title.addEventListener('input', () => {
  fetch('/title', { method: 'PUT', headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ title: title.value }) });
});

function render(view) {
  document.getElementById('root').className = view.accent;
  document.getElementById('countdown').textContent = view.countdown;
  const prompt = document.getElementById('prompt');
  prompt.hidden = !view.prompt;
  prompt.textContent = view.prompt || '';
  title.hidden = !view.title_visible;
  if (document.activeElement !== title) title.value = view.title;
  const status = document.getElementById('status');
  status.hidden = !view.status_label;
  status.textContent = view.status_label || '';

  const controls = document.getElementById('controls');
  controls.replaceChildren(...view.controls.map(c => {
    const button = document.createElement('button');
    button.className = c.control;
    button.textContent = c.label;
    button.onclick = () => fetch(c.endpoint, { method: 'POST' });
    return button;
  }));

  const stats = document.getElementById('stats');
  stats.replaceChildren(...view.stats.map(row => {
    const tr = document.createElement('tr');
    for (const text of [row.label, row.value]) {
      const td = document.createElement('td');
      td.textContent = text;
      tr.appendChild(td);
    }
    return tr;
  }));
}

fetch('/status').then(r => r.json()).then(s => render(s.view));
const events = new EventSource('/events');
events.addEventListener('snapshot', e => render(JSON.parse(e.data).view));
events.addEventListener('cue', e => play(JSON.parse(e.data).sound));
</script>
</body>
</html>
"##;
