// Browser shell: a full-bleed container that shows the latest frame and
// forwards pointer and resize events back to the server
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Bitcoin: 2017 vs 2021</title>
<style>
  html, body { margin: 0; height: 100%; }
  #chart {
    box-sizing: border-box;
    min-height: 100%;
    height: 100vh;
    width: 100%;
    padding: 4vh 4vw;
  }
  #surface { width: 100%; height: 100%; }
  #surface svg { display: block; }
</style>
</head>
<body>
<div id="chart"><div id="surface"></div></div>
<script>
  const surface = document.getElementById("surface");
  const post = (path) => fetch(path, { method: "POST" });

  let pending = null;
  let pointer = { x: 0, y: 0 };
  surface.addEventListener("mousemove", (e) => {
    const rect = surface.getBoundingClientRect();
    pointer = { x: Math.round(e.clientX - rect.left), y: Math.round(e.clientY - rect.top) };
    if (pending === null) {
      pending = requestAnimationFrame(() => {
        pending = null;
        post(`/events/pointer?x=${pointer.x}&y=${pointer.y}`);
      });
    }
  });
  surface.addEventListener("mouseleave", () => post("/events/leave"));

  const resize = () => {
    const width = Math.floor(surface.clientWidth);
    const height = Math.floor(surface.clientHeight);
    post(`/events/resize?width=${width}&height=${height}`);
  };
  new ResizeObserver(resize).observe(surface);

  const frames = new EventSource("/chart/stream");
  frames.addEventListener("frame", (e) => { surface.innerHTML = e.data; });
</script>
</body>
</html>
"#;
