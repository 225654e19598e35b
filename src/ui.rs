use crate::days::{date_key, DateRange};

pub fn render_index(range: &DateRange) -> String {
    INDEX_HTML
        .replace("{{START}}", &date_key(range.start))
        .replace("{{END}}", &date_key(range.end))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Attendance Register</title>
  <style>
    :root {
      --bg: #f3f4f6;
      --ink: #1f2933;
      --accent: #3b82f6;
      --accent-dark: #2563eb;
      --danger: #ef4444;
      --ok: #22c55e;
      --card: white;
      --shadow: 0 12px 32px rgba(31, 41, 51, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: system-ui, "Segoe UI", sans-serif;
      padding: 20px;
    }

    h1 {
      text-align: center;
      color: var(--accent-dark);
      margin: 0 0 20px;
    }

    .range {
      display: flex;
      justify-content: center;
      align-items: center;
      gap: 8px;
      margin-bottom: 16px;
    }

    .range input {
      border: 1px solid #cbd2d9;
      border-radius: 6px;
      padding: 4px 8px;
    }

    .range-error {
      text-align: center;
      color: var(--danger);
      min-height: 1.2em;
      margin-bottom: 12px;
    }

    .table-wrap {
      overflow-x: auto;
    }

    table {
      min-width: 100%;
      background: var(--card);
      border-collapse: collapse;
      border-radius: 8px;
      box-shadow: var(--shadow);
      overflow: hidden;
    }

    thead {
      background: var(--accent);
      color: white;
    }

    th, td {
      padding: 8px 14px;
      text-align: center;
      white-space: nowrap;
    }

    tbody tr:nth-child(odd) {
      background: var(--bg);
    }

    td.name input {
      width: 18rem;
      padding: 4px 8px;
      border: 1px solid #cbd2d9;
      border-radius: 6px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 6px;
      padding: 8px 14px;
      font-weight: 600;
      color: white;
      cursor: pointer;
      background: var(--accent);
    }

    button:hover {
      background: var(--accent-dark);
    }

    button.delete {
      background: var(--danger);
      padding: 4px 8px;
    }

    button.export {
      background: var(--ok);
    }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      gap: 12px;
      margin-top: 20px;
    }

    .toolbar .group {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      gap: 8px;
    }

    .status {
      text-align: center;
      min-height: 1.2em;
      margin: 16px 0;
    }

    .status[data-type="error"] {
      color: var(--danger);
    }

    .remote[hidden] {
      display: none;
    }
  </style>
</head>
<body>
  <h1>Attendance Register</h1>

  <section class="range">
    <input id="start" type="date" value="{{START}}" />
    <span>to</span>
    <input id="end" type="date" value="{{END}}" />
  </section>
  <div id="range-error" class="range-error"></div>

  <div class="table-wrap">
    <table>
      <thead id="head"></thead>
      <tbody id="body"></tbody>
    </table>
  </div>

  <div id="status" class="status"></div>

  <section class="toolbar">
    <div class="group">
      <button id="add" type="button">Add Student</button>
    </div>
    <div class="group">
      <input id="import" type="file" accept=".csv" />
      <button id="export" class="export" type="button">Export to CSV</button>
    </div>
    <div id="remote" class="group remote" hidden>
      <button id="sign-in" type="button">Sign in</button>
      <button id="sign-out" type="button">Sign out</button>
      <button id="remote-save" type="button">Save to drive</button>
      <button id="remote-load" type="button">Load from drive</button>
    </div>
  </section>

  <script>
    const head = document.getElementById('head');
    const body = document.getElementById('body');
    const statusEl = document.getElementById('status');
    const rangeError = document.getElementById('range-error');
    const startInput = document.getElementById('start');
    const endInput = document.getElementById('end');
    let focusIndex = null;
    // Name writes go out one at a time so the sort never overtakes them.
    let nameWrites = Promise.resolve();

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const request = async (method, url, payload) => {
      const options = { method, headers: {} };
      if (payload !== undefined) {
        options.headers['content-type'] = 'application/json';
        options.body = JSON.stringify(payload);
      }
      const res = await fetch(url, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const cell = (tag, text) => {
      const el = document.createElement(tag);
      el.textContent = text;
      return el;
    };

    const render = (register) => {
      rangeError.textContent = register.range_error || '';

      head.replaceChildren();
      const headRow = document.createElement('tr');
      headRow.append(cell('th', 'Name'));
      register.days.forEach((day) => headRow.append(cell('th', day.label)));
      ['Total Days', 'Days Present', 'Days Absent', 'Percentage', 'Actions']
        .forEach((label) => headRow.append(cell('th', label)));
      head.append(headRow);

      body.replaceChildren();
      register.students.forEach((student, index) => {
        const row = document.createElement('tr');

        const nameCell = document.createElement('td');
        nameCell.className = 'name';
        const input = document.createElement('input');
        input.type = 'text';
        input.value = student.name;
        input.addEventListener('input', () => {
          const name = input.value;
          nameWrites = nameWrites
            .then(() => request('PUT', `/api/students/${index}/name`, { name }))
            .catch((err) => setStatus(err.message, 'error'));
        });
        input.addEventListener('blur', () => {
          focusIndex = null;
          const name = input.value;
          nameWrites = nameWrites
            .then(() => request('POST', '/api/students/sort', { index, name }))
            .then(render)
            .catch((err) => setStatus(err.message, 'error'));
        });
        nameCell.append(input);
        row.append(nameCell);

        register.days.forEach((_, dayIndex) => {
          const td = document.createElement('td');
          const box = document.createElement('input');
          box.type = 'checkbox';
          box.checked = !!student.attendance[dayIndex];
          box.addEventListener('change', () => {
            request('POST', `/api/students/${index}/days/${dayIndex}/toggle`).then(render)
              .catch((err) => setStatus(err.message, 'error'));
          });
          td.append(box);
          row.append(td);
        });

        row.append(cell('td', student.totals.total_days));
        row.append(cell('td', student.totals.present));
        row.append(cell('td', student.totals.absent));
        row.append(cell('td', `${student.percentage_label}%`));

        const actions = document.createElement('td');
        const del = cell('button', 'Delete');
        del.className = 'delete';
        del.addEventListener('click', () => {
          request('DELETE', `/api/students/${index}`).then(render)
            .catch((err) => setStatus(err.message, 'error'));
        });
        actions.append(del);
        row.append(actions);

        body.append(row);
        if (index === focusIndex) {
          input.focus();
        }
      });
    };

    const changeRange = () => {
      request('PUT', '/api/range', { start: startInput.value, end: endInput.value })
        .then(render)
        .catch((err) => { rangeError.textContent = err.message; });
    };
    startInput.addEventListener('change', changeRange);
    endInput.addEventListener('change', changeRange);

    document.getElementById('add').addEventListener('click', () => {
      request('POST', '/api/students').then((res) => {
        focusIndex = res.index;
        render(res.register);
      }).catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('export').addEventListener('click', () => {
      const link = document.createElement('a');
      link.href = '/api/export';
      link.download = 'attendance.csv';
      document.body.append(link);
      link.click();
      link.remove();
    });

    document.getElementById('import').addEventListener('change', async (event) => {
      const file = event.target.files[0];
      if (!file) return;
      const res = await fetch('/api/import', { method: 'POST', body: await file.text() });
      if (res.ok) {
        setStatus((await res.json()).message, 'ok');
      } else {
        setStatus(await res.text(), 'error');
      }
      request('GET', '/api/register').then(render);
    });

    const remoteBox = document.getElementById('remote');
    const showRemote = (status) => {
      remoteBox.hidden = !status.enabled;
      document.getElementById('sign-in').hidden = status.signed_in;
      document.getElementById('sign-out').hidden = !status.signed_in;
    };
    const remoteAction = (url, onDone) => {
      request('POST', url).then(onDone).catch((err) => setStatus(err.message, 'error'));
    };
    document.getElementById('sign-in').addEventListener('click', () => remoteAction('/api/remote/sign-in', showRemote));
    document.getElementById('sign-out').addEventListener('click', () => remoteAction('/api/remote/sign-out', showRemote));
    document.getElementById('remote-save').addEventListener('click', () =>
      remoteAction('/api/remote/save', (res) => setStatus(res.message, 'ok')));
    document.getElementById('remote-load').addEventListener('click', () =>
      remoteAction('/api/remote/load', (register) => {
        render(register);
        setStatus('Loaded from drive.', 'ok');
      }));

    request('GET', '/api/register').then(render).catch((err) => setStatus(err.message, 'error'));
    request('GET', '/api/remote/status').then(showRemote).catch(() => {});
  </script>
</body>
</html>
"#;
