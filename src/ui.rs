pub fn render_dashboard(email: &str) -> String {
    DASHBOARD_HTML.replace("{{EMAIL}}", &escape_html(email))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub const LOGIN_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Admin Sign In</title>
  <style>
    :root {
      --bg-1: #eef2f7;
      --bg-2: #dbe7f4;
      --ink: #1f2933;
      --accent: #2563eb;
      --muted: #64748b;
      --card: #ffffff;
      --shadow: 0 18px 48px rgba(30, 58, 95, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      display: grid;
      place-items: center;
      padding: 24px;
    }

    .card {
      width: min(420px, 100%);
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 20px;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
      font-size: 0.95rem;
    }

    form {
      display: grid;
      gap: 14px;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      font-weight: 600;
      color: var(--muted);
    }

    input {
      border: 1px solid #cbd5e1;
      border-radius: 8px;
      padding: 10px 12px;
      font-size: 1rem;
    }

    input:focus {
      outline: 2px solid var(--accent);
      border-color: transparent;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 8px;
      padding: 12px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button:disabled {
      opacity: 0.6;
      cursor: wait;
    }

    .status {
      font-size: 0.9rem;
      color: var(--muted);
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #b91c1c;
    }

    .status[data-type="ok"] {
      color: #15803d;
    }
  </style>
</head>
<body>
  <main class="card">
    <header>
      <h1>Admin sign in</h1>
      <p class="subtitle">Sign in to access the dashboard.</p>
    </header>

    <form id="login-form">
      <label>Email
        <input id="email" type="email" autocomplete="username" required />
      </label>
      <label>Password
        <input id="password" type="password" autocomplete="current-password" required />
      </label>
      <button id="submit" type="submit">Sign in</button>
    </form>

    <div class="status" id="status"></div>
  </main>

  <script>
    const form = document.getElementById('login-form');
    const statusEl = document.getElementById('status');
    const submitBtn = document.getElementById('submit');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      setStatus('', '');
      submitBtn.disabled = true;
      submitBtn.textContent = 'Signing in...';

      try {
        const res = await fetch('/api/login', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({
            email: document.getElementById('email').value,
            password: document.getElementById('password').value
          })
        });

        if (!res.ok) {
          setStatus((await res.text()) || 'Sign-in failed', 'error');
          return;
        }

        setStatus('Welcome, administrator', 'ok');
        window.location.assign('/');
      } catch (err) {
        setStatus('An unexpected error occurred', 'error');
      } finally {
        submitBtn.disabled = false;
        submitBtn.textContent = 'Sign in';
      }
    });
  </script>
</body>
</html>
"#;

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Admin Dashboard</title>
  <style>
    :root {
      --bg-1: #eef2f7;
      --bg-2: #dbe7f4;
      --ink: #1f2933;
      --accent: #2563eb;
      --muted: #64748b;
      --card: #ffffff;
      --shadow: 0 18px 48px rgba(30, 58, 95, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      padding: 32px 18px 48px;
    }

    .page {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    .topbar {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
    }

    h1 {
      margin: 0;
      font-size: 2rem;
    }

    .greeting {
      margin: 4px 0 0;
      color: var(--muted);
      font-size: 0.95rem;
    }

    .logout {
      appearance: none;
      border: 1px solid #cbd5e1;
      border-radius: 8px;
      padding: 10px 16px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--card);
      color: var(--ink);
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 16px;
    }

    .stat {
      background: var(--card);
      border-radius: 14px;
      padding: 20px;
      box-shadow: var(--shadow);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 2.2rem;
      font-weight: 700;
      color: var(--accent);
    }

    .chart-card {
      background: var(--card);
      border-radius: 14px;
      padding: 20px;
      box-shadow: var(--shadow);
      display: grid;
      gap: 12px;
    }

    .chart-card h2 {
      margin: 0;
      font-size: 1.2rem;
    }

    .chart-card .subtitle {
      margin: 0;
      color: var(--muted);
      font-size: 0.9rem;
    }

    #chart {
      width: 100%;
      height: 280px;
      display: block;
    }

    .chart-grid {
      stroke: rgba(100, 116, 139, 0.2);
    }

    .chart-bar {
      fill: var(--accent);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
    }

    .status {
      font-size: 0.9rem;
      color: var(--muted);
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #b91c1c;
    }

    @media (max-width: 600px) {
      h1 {
        font-size: 1.5rem;
      }
    }
  </style>
</head>
<body>
  <main class="page">
    <div class="topbar">
      <div>
        <h1>Admin dashboard</h1>
        <p class="greeting" id="greeting">Signed in as {{EMAIL}}</p>
      </div>
      <button class="logout" id="logout" type="button">Sign out</button>
    </div>

    <section class="cards">
      <div class="stat">
        <span class="label">Searches</span>
        <span class="value" id="searches">0</span>
      </div>
      <div class="stat">
        <span class="label">Site visits</span>
        <span class="value" id="visits">0</span>
      </div>
    </section>

    <section class="chart-card">
      <div>
        <h2>Visits per day</h2>
        <p class="subtitle">The last 7 recorded days.</p>
      </div>
      <svg id="chart" viewBox="0 0 640 280" aria-label="Visits per day" role="img"></svg>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const greetingEl = document.getElementById('greeting');
    const searchesEl = document.getElementById('searches');
    const visitsEl = document.getElementById('visits');
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const renderBarChart = (buckets) => {
      if (!buckets.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No visits yet</text>';
        return;
      }

      const width = 640;
      const height = 280;
      const paddingX = 44;
      const paddingY = 36;
      const top = 20;

      const max = Math.max(...buckets.map((bucket) => bucket.count), 1);
      const innerWidth = width - paddingX * 2;
      const innerHeight = height - top - paddingY;
      const slot = innerWidth / buckets.length;
      const barWidth = Math.min(slot * 0.6, 64);

      const ticks = 4;
      let parts = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = (max * i) / ticks;
        const y = height - paddingY - (value / max) * innerHeight;
        parts += `<line class="chart-grid" x1="${paddingX}" y1="${y}" x2="${width - paddingX}" y2="${y}" />`;
        parts += `<text class="chart-label" x="${paddingX - 8}" y="${y + 4}" text-anchor="end">${Math.round(value)}</text>`;
      }

      buckets.forEach((bucket, index) => {
        const x = paddingX + index * slot + (slot - barWidth) / 2;
        const barHeight = (bucket.count / max) * innerHeight;
        const y = height - paddingY - barHeight;
        parts += `<rect class="chart-bar" x="${x.toFixed(1)}" y="${y.toFixed(1)}" width="${barWidth.toFixed(1)}" height="${barHeight.toFixed(1)}" rx="3" />`;
        parts += `<text class="chart-label" x="${(x + barWidth / 2).toFixed(1)}" y="${height - paddingY + 18}" text-anchor="middle">${bucket.date}</text>`;
      });

      chartEl.innerHTML = parts;
    };

    const loadStats = async () => {
      const res = await fetch('/api/stats');
      if (res.status === 401) {
        window.location.assign('/login');
        return;
      }
      if (!res.ok) {
        setStatus('Failed to load statistics', 'error');
        return;
      }

      const stats = await res.json();
      searchesEl.textContent = stats.search_count;
      visitsEl.textContent = stats.total_visits;
      renderBarChart(stats.visits_by_day);
      setStatus('', '');
    };

    const watchSession = async () => {
      for (;;) {
        let res;
        try {
          res = await fetch('/api/session/watch');
        } catch (err) {
          await new Promise((resolve) => setTimeout(resolve, 2000));
          continue;
        }

        if (res.status === 401) {
          window.location.assign('/login');
          return;
        }
        if (!res.ok) {
          await new Promise((resolve) => setTimeout(resolve, 2000));
          continue;
        }

        const body = await res.json();
        if (!body.signed_in) {
          window.location.assign('/login');
          return;
        }
        if (body.email) {
          greetingEl.textContent = 'Signed in as ' + body.email;
        }
      }
    };

    document.getElementById('logout').addEventListener('click', async () => {
      try {
        await fetch('/api/logout', { method: 'POST' });
      } finally {
        window.location.assign('/login');
      }
    });

    loadStats().catch(() => setStatus('Failed to load statistics', 'error'));
    watchSession();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_greets_the_signed_in_email() {
        let page = render_dashboard("admin@example.com");
        assert!(page.contains("Signed in as admin@example.com"));
        assert!(!page.contains("{{EMAIL}}"));
    }

    #[test]
    fn dashboard_escapes_markup_in_the_email() {
        let page = render_dashboard("a<b>@example.com");
        assert!(page.contains("a&lt;b&gt;@example.com"));
        assert!(!page.contains("a<b>@example.com"));
    }
}
