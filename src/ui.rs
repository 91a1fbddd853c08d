pub fn render_index(date: &str, logged_count: usize) -> String {
    INDEX_HTML
        .replace("{{DATE}}", date)
        .replace("{{COUNT}}", &logged_count.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Mood Journal</title>
  <style>
    :root {
      --bg: #f4f1ec;
      --ink: #2b2a28;
      --accent: #4f7cac;
      --card: #ffffff;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border-radius: 24px;
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    .ratings {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 12px;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.9rem;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .tabs button {
      background: transparent;
      color: var(--accent);
    }

    .tabs button.active {
      background: var(--accent);
      color: white;
    }

    .day {
      display: grid;
      grid-template-columns: 70px 1fr 48px;
      align-items: center;
      gap: 10px;
    }

    .bar {
      height: 10px;
      border-radius: 5px;
      background: var(--accent);
    }

    .toast[data-kind="error"] {
      color: #c63b2b;
    }

    .toast[data-kind="warning"] {
      color: #a86b00;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Mood Journal</h1>
      <p>{{DATE}} &middot; <span id="count">{{COUNT}}</span> check-ins saved</p>
    </header>

    <form id="mood-form" class="ratings">
      <label>Mood <input name="mood" type="range" min="1" max="5" value="3" /></label>
      <label>Energy <input name="energy" type="range" min="1" max="5" value="3" /></label>
      <label>Anxiety <input name="anxiety" type="range" min="1" max="5" value="3" /></label>
      <label>Sleep <input name="sleep" type="range" min="1" max="5" value="3" /></label>
      <label>Note <input name="note" type="text" /></label>
      <button type="submit">Log mood</button>
    </form>

    <div class="toast" id="toast"></div>

    <section>
      <div class="tabs">
        <button type="button" data-period="week" class="active">Week</button>
        <button type="button" data-period="month">Month</button>
        <button type="button" data-period="quarter">Quarter</button>
      </div>
      <div id="days"></div>
      <p id="averages"></p>
    </section>
  </main>

  <script>
    const daysEl = document.getElementById('days');
    const averagesEl = document.getElementById('averages');
    const toastEl = document.getElementById('toast');
    const countEl = document.getElementById('count');
    const tabs = Array.from(document.querySelectorAll('.tabs button'));
    let period = 'week';

    const showToast = (toast) => {
      toastEl.textContent = toast.message;
      toastEl.dataset.kind = toast.kind;
      toastEl.dataset.id = toast.id;
      setTimeout(() => {
        if (toastEl.dataset.id === String(toast.id)) {
          toastEl.textContent = '';
        }
      }, 2500);
    };

    const renderInsights = (data) => {
      if (!data.days.length) {
        daysEl.innerHTML = '<p>No check-ins in this period yet.</p>';
        averagesEl.textContent = '';
        return;
      }
      daysEl.innerHTML = data.days
        .map((day) => `<div class="day"><span>${day.display_label}</span>` +
          `<div class="bar" style="width:${day.wellness * 20}%"></div>` +
          `<span>${day.wellness.toFixed(1)}</span></div>`)
        .join('');
      const avg = data.averages;
      averagesEl.textContent =
        `Average mood ${avg.mood}, energy ${avg.energy}, anxiety ${avg.anxiety}, sleep ${avg.sleep}`;
    };

    const loadInsights = async () => {
      const res = await fetch(`/api/insights?period=${period}`);
      if (!res.ok) {
        daysEl.innerHTML = "<p>Can't display insights right now.</p>";
        return;
      }
      renderInsights(await res.json());
    };

    tabs.forEach((button) => {
      button.addEventListener('click', () => {
        period = button.dataset.period;
        tabs.forEach((tab) => tab.classList.toggle('active', tab === button));
        loadInsights();
      });
    });

    document.getElementById('mood-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      const payload = {
        mood: Number(form.get('mood')),
        energy: Number(form.get('energy')),
        anxiety: Number(form.get('anxiety')),
        sleep: Number(form.get('sleep')),
        note: form.get('note') || null
      };
      const res = await fetch('/api/moods', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(payload)
      });
      if (!res.ok) {
        showToast({ id: 0, kind: 'error', message: await res.text() });
        return;
      }
      const body = await res.json();
      showToast(body.toast);
      countEl.textContent = Number(countEl.textContent) + 1;
      loadInsights();
    });

    loadInsights();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_fills_placeholders() {
        let html = render_index("2026-01-05", 12);
        assert!(html.contains("2026-01-05"));
        assert!(html.contains(">12<"));
        assert!(!html.contains("{{"));
    }
}
