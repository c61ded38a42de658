use crate::models::SessionResponse;
use crate::views::Screen;

pub fn render_index(session: &SessionResponse) -> String {
    let (name, screen) = match (&session.account, session.screen) {
        (Some(account), Screen::App(view)) => (account.name.as_str(), view.as_str()),
        _ => ("Guest", "auth"),
    };
    let nav = session
        .nav
        .iter()
        .map(|item| {
            format!(
                r#"<button class="tab" type="button" data-view="{}">{}</button>"#,
                item.view.as_str(),
                item.label
            )
        })
        .collect::<Vec<_>>()
        .join("");

    INDEX_HTML
        .replace("{{NAME}}", &escape_html(name))
        .replace("{{SCREEN}}", screen)
        .replace("{{NAV}}", &nav)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Vitali</title>
  <style>
    :root {
      --bg: #020617;
      --card: #0f172a;
      --ink: #f1f5f9;
      --muted: #94a3b8;
      --accent: #10b981;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border: 1px solid #1e293b;
      border-radius: 24px;
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      letter-spacing: 0.3em;
      text-transform: uppercase;
    }

    .subtitle {
      margin: 0;
      color: var(--muted);
    }

    .tabs {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .tab, button {
      appearance: none;
      border: 1px solid #1e293b;
      background: transparent;
      color: var(--ink);
      border-radius: 12px;
      padding: 10px 14px;
      font-weight: 600;
      cursor: pointer;
    }

    button.primary {
      background: var(--accent);
      border-color: var(--accent);
    }

    form {
      display: grid;
      gap: 10px;
    }

    input {
      background: #020617;
      border: 1px solid #1e293b;
      border-radius: 10px;
      color: var(--ink);
      padding: 10px 12px;
    }

    pre {
      background: #020617;
      border-radius: 12px;
      padding: 16px;
      overflow: auto;
      max-height: 360px;
      color: var(--muted);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Vitali</h1>
      <p class="subtitle">Signed in as <strong id="name">{{NAME}}</strong>, screen <code id="screen">{{SCREEN}}</code>.</p>
    </header>

    <nav class="tabs">{{NAV}}</nav>

    <form id="login-form">
      <input name="username" placeholder="admin" required />
      <input name="password" type="password" placeholder="password" required />
      <button class="primary" type="submit">Authorize</button>
    </form>

    <button id="logout" type="button">Disconnect</button>

    <pre id="output"></pre>
  </main>

  <script>
    const output = document.getElementById('output');

    async function call(method, path, body) {
      const response = await fetch(path, {
        method,
        headers: body ? { 'Content-Type': 'application/json' } : {},
        body: body ? JSON.stringify(body) : undefined,
      });
      const text = await response.text();
      output.textContent = `${response.status} ${path}\n${text}`;
      return response;
    }

    document.getElementById('login-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      const response = await call('POST', '/api/session/login', Object.fromEntries(form));
      if (response.ok) window.location.reload();
    });

    document.getElementById('logout').addEventListener('click', async () => {
      await call('POST', '/api/session/logout');
      window.location.reload();
    });

    const endpoints = {
      dashboard: '/api/dashboard',
      coach: '/api/coach',
      comm: '/api/channel?code=GLOBAL-01',
      vault: '/api/media',
      admin: '/api/admin/accounts',
    };

    document.querySelectorAll('[data-view]').forEach((tab) => {
      tab.addEventListener('click', async () => {
        const view = tab.dataset.view;
        await call('POST', `/api/view/${view}`);
        document.getElementById('screen').textContent = view;
        if (endpoints[view]) await call('GET', endpoints[view]);
      });
    });
  </script>
</body>
</html>
"#;
