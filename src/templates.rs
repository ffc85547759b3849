//! Static template text for the generated viewer.
//!
//! Centralising every template here serves two purposes:
//!
//! 1. **Single source of truth** — the original tool grew five diverging
//!    copies of its viewer; one parameterised template per document type,
//!    assembled from the constants below, eliminates that drift.
//!
//! 2. **Testability** — unit tests can inspect the constants directly and
//!    the assembler stays a pure string function.
//!
//! The text is emitted verbatim into the output bundle; it is content, not
//! server logic. The script keeps its state in one `viewer` object instead
//! of ambient globals.

/// Stylesheet written to `css/style.css`.
///
/// Covers the full widget set; selectors for disabled features are inert.
pub const VIEWER_CSS: &str = r#"* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    background: #e8e8e8;
    color: #333;
    overflow: hidden;
    height: 100vh;
}

#flipbook-container {
    display: flex;
    flex-direction: column;
    height: 100vh;
}

#flipbook-toolbar {
    background: #2563a6;
    padding: 8px 15px;
    display: flex;
    align-items: center;
    gap: 5px;
    box-shadow: 0 2px 4px rgba(0,0,0,0.2);
    z-index: 100;
}

.toolbar-btn {
    background: transparent;
    color: white;
    border: none;
    padding: 8px 12px;
    cursor: pointer;
    border-radius: 3px;
    font-size: 16px;
    transition: background 0.2s;
}

.toolbar-btn:hover {
    background: rgba(255, 255, 255, 0.15);
}

.toolbar-btn:disabled {
    opacity: 0.4;
    cursor: default;
}

#page-info {
    background: white;
    color: #333;
    padding: 4px 12px;
    border-radius: 3px;
    font-size: 14px;
    margin: 0 10px;
    min-width: 60px;
    text-align: center;
}

#current-page {
    font-weight: 600;
}

#flipbook-viewer {
    flex: 1;
    display: flex;
    align-items: center;
    justify-content: center;
    position: relative;
    overflow: auto;
    background: #e8e8e8;
    perspective: 1500px;
    padding: 20px;
}

#page-container {
    max-width: 1400px;
    width: 100%;
    display: flex;
    align-items: center;
    justify-content: center;
    gap: 2px;
    transform-style: preserve-3d;
    position: relative;
    background: white;
    box-shadow: 0 4px 20px rgba(0,0,0,0.15);
}

.page-spread {
    position: relative;
    width: 50%;
    background: white;
}

.page-spread img {
    width: 100%;
    height: auto;
    display: block;
    object-fit: contain;
}

.page-left {
    transform-origin: right center;
    border-right: 1px solid #ddd;
}

.page-right {
    transform-origin: left center;
    border-left: 1px solid #ddd;
}

.page-right.page-turning-next {
    animation: pageFlipRight 0.7s cubic-bezier(0.645, 0.045, 0.355, 1);
    z-index: 10;
}

.page-left.page-turning-prev {
    animation: pageFlipLeft 0.7s cubic-bezier(0.645, 0.045, 0.355, 1);
    z-index: 10;
}

@keyframes pageFlipRight {
    0%   { transform: rotateY(0deg); filter: brightness(1); }
    50%  { transform: rotateY(-90deg); filter: brightness(0.6); }
    100% { transform: rotateY(-180deg); filter: brightness(0.85); opacity: 0; }
}

@keyframes pageFlipLeft {
    0%   { transform: rotateY(0deg); filter: brightness(1); }
    50%  { transform: rotateY(90deg); filter: brightness(0.6); }
    100% { transform: rotateY(180deg); filter: brightness(0.85); opacity: 0; }
}

.nav-btn {
    position: absolute;
    top: 50%;
    transform: translateY(-50%);
    background: rgba(37, 99, 166, 0.7);
    color: white;
    border: none;
    font-size: 48px;
    padding: 20px 15px;
    cursor: pointer;
    z-index: 10;
    transition: background 0.3s;
    line-height: 1;
    border-radius: 4px;
}

.nav-btn:hover {
    background: rgba(37, 99, 166, 0.9);
}

.nav-btn:disabled {
    opacity: 0.3;
    cursor: not-allowed;
}

#prev-btn { left: 10px; }
#next-btn { right: 10px; }

#thumbnail-bar {
    background: #f5f5f5;
    padding: 10px;
    overflow-x: auto;
    overflow-y: hidden;
    border-top: 1px solid #ddd;
}

#thumbnail-container {
    display: flex;
    gap: 10px;
    width: max-content;
}

.thumbnail {
    height: 100px;
    cursor: pointer;
    border: 3px solid transparent;
    transition: border-color 0.3s, transform 0.3s;
    box-shadow: 0 2px 4px rgba(0,0,0,0.1);
}

.thumbnail:hover {
    transform: scale(1.05);
}

.thumbnail.active {
    border-color: #2563a6;
    box-shadow: 0 4px 8px rgba(37, 99, 166, 0.3);
}

.overlay {
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    background: rgba(0,0,0,0.7);
    z-index: 1000;
    display: flex;
    align-items: center;
    justify-content: center;
}

.overlay-content {
    background: white;
    padding: 30px;
    border-radius: 8px;
    max-width: 500px;
    width: 90%;
}

.overlay-content h2 {
    margin-bottom: 20px;
}

.overlay-content input {
    width: 100%;
    padding: 10px;
    border: 1px solid #ddd;
    border-radius: 4px;
    font-size: 16px;
    margin-bottom: 15px;
}

.overlay-content button {
    background: #2563a6;
    color: white;
    border: none;
    padding: 10px 20px;
    border-radius: 4px;
    cursor: pointer;
}

.overlay-content ul {
    list-style: none;
    max-height: 300px;
    overflow-y: auto;
}

.overlay-content li {
    padding: 8px 0;
    border-bottom: 1px solid #eee;
}

.overlay-content a {
    color: #2563a6;
    text-decoration: none;
}

#search-results {
    max-height: 400px;
    overflow-y: auto;
    margin: 15px 0;
}

.search-result-item {
    padding: 10px;
    margin: 5px 0;
    background: #f5f5f5;
    border-radius: 4px;
    cursor: pointer;
}

.search-result-item:hover {
    background: #e0e0e0;
}

.search-result-page {
    font-weight: bold;
    color: #2563a6;
    margin-bottom: 5px;
}

.search-result-snippet {
    font-size: 14px;
    color: #666;
}

.search-highlight {
    background: yellow;
    font-weight: bold;
}

@media (max-width: 768px) {
    .toolbar-btn { padding: 6px 10px; font-size: 14px; }
    #page-info { font-size: 12px; padding: 3px 8px; }
    .nav-btn { font-size: 32px; padding: 15px 10px; }
    .thumbnail { height: 80px; }
    .page-spread { width: 100%; }
    .page-left + .page-right { display: none; }
}
"#;

/// Core viewer script: spread paging, thumbnails, keyboard and touch
/// navigation. Reads `totalPages` (and optional `searchData`,
/// `pdfFileName`) from globals declared inline in `index.html`.
pub const VIEWER_JS_CORE: &str = r#"'use strict';

const viewer = {
    spread: 0,       // 0 = pages 1-2, 1 = pages 3-4, ...
    zoom: 1,
    animating: false,
    mobile: window.innerWidth <= 768,
};

const on = (id, event, handler) => {
    const el = document.getElementById(id);
    if (el) el.addEventListener(event, handler);
    return el;
};

const pageContainer = document.getElementById('page-container');
const currentPageSpan = document.getElementById('current-page');
const prevBtn = document.getElementById('prev-btn');
const nextBtn = document.getElementById('next-btn');
const thumbnails = document.querySelectorAll('.thumbnail');

function maxSpread() {
    return Math.max(Math.ceil(totalPages / 2) - 1, 0);
}

function spreadPage(spread, side) {
    return spread * 2 + (side === 'left' ? 1 : 2);
}

function buildPage(pageNum, side, direction) {
    const div = document.createElement('div');
    div.className = 'page-spread page-' + side;
    if (side === 'right' && direction === 'next') div.classList.add('page-turning-next');
    if (side === 'left' && direction === 'prev') div.classList.add('page-turning-prev');
    const img = document.createElement('img');
    img.src = 'files/pages/' + pageNum + '.jpg';
    img.alt = 'Page ' + pageNum;
    div.appendChild(img);
    return div;
}

function loadSpread(spread, direction) {
    if (viewer.animating || totalPages === 0) return;
    viewer.spread = Math.min(Math.max(spread, 0), maxSpread());

    const left = spreadPage(viewer.spread, 'left');
    const right = spreadPage(viewer.spread, 'right');

    pageContainer.innerHTML = '';
    if (left <= totalPages) {
        pageContainer.appendChild(buildPage(left, 'left', direction));
    }
    if (!viewer.mobile && right <= totalPages) {
        pageContainer.appendChild(buildPage(right, 'right', direction));
    }

    if (viewer.mobile || right > totalPages) {
        currentPageSpan.textContent = left;
    } else {
        currentPageSpan.textContent = left + '-' + right;
    }

    prevBtn.disabled = viewer.spread === 0;
    nextBtn.disabled = viewer.mobile ? left >= totalPages : right >= totalPages;

    thumbnails.forEach(thumb => {
        const page = parseInt(thumb.dataset.page, 10);
        thumb.classList.toggle('active', page === left || (!viewer.mobile && page === right));
    });
    const active = document.querySelector('.thumbnail[data-page="' + left + '"]');
    if (active) active.scrollIntoView({ behavior: 'smooth', block: 'nearest', inline: 'center' });

    if (direction) {
        viewer.animating = true;
        setTimeout(() => { viewer.animating = false; }, 700);
    }
}

function goToPage(pageNum) {
    loadSpread(Math.floor((pageNum - 1) / 2));
}

const nextPage = () => loadSpread(viewer.spread + 1, 'next');
const prevPage = () => loadSpread(viewer.spread - 1, 'prev');

on('prev-btn', 'click', prevPage);
on('next-btn', 'click', nextPage);
on('prev-page-btn', 'click', prevPage);
on('next-page-btn', 'click', nextPage);
on('first-page-btn', 'click', () => loadSpread(0, 'prev'));
on('last-page-btn', 'click', () => loadSpread(maxSpread(), 'next'));

on('fullscreen-btn', 'click', () => {
    if (!document.fullscreenElement) {
        document.documentElement.requestFullscreen();
    } else {
        document.exitFullscreen();
    }
});

thumbnails.forEach(thumb => {
    thumb.addEventListener('click', () => goToPage(parseInt(thumb.dataset.page, 10)));
});

document.addEventListener('keydown', e => {
    switch (e.key) {
        case 'ArrowLeft':
        case 'PageUp':
            prevPage();
            break;
        case 'ArrowRight':
        case 'PageDown':
        case ' ':
            e.preventDefault();
            nextPage();
            break;
        case 'Home':
            loadSpread(0);
            break;
        case 'End':
            loadSpread(maxSpread());
            break;
    }
});

let touchStartX = 0;
pageContainer.addEventListener('touchstart', e => {
    touchStartX = e.changedTouches[0].screenX;
}, false);
pageContainer.addEventListener('touchend', e => {
    const dx = e.changedTouches[0].screenX - touchStartX;
    if (dx < -50) nextPage();
    if (dx > 50) prevPage();
}, false);

loadSpread(0);
"#;

/// Zoom-panel snippet, appended when the zoom feature is enabled.
pub const VIEWER_JS_ZOOM: &str = r#"
function applyZoom(level) {
    viewer.zoom = Math.min(Math.max(level, 0.5), 3);
    pageContainer.style.transform = 'scale(' + viewer.zoom + ')';
}

on('zoom-in-btn', 'click', () => applyZoom(viewer.zoom + 0.25));
on('zoom-out-btn', 'click', () => applyZoom(viewer.zoom - 0.25));
"#;

/// Search-overlay snippet, appended when search data is embedded.
pub const VIEWER_JS_SEARCH: &str = r#"
const searchOverlay = document.getElementById('search-overlay');
const searchInput = document.getElementById('search-input');
const searchResults = document.getElementById('search-results');

function toggleSearch() {
    const show = searchOverlay.style.display === 'none';
    searchOverlay.style.display = show ? 'flex' : 'none';
    if (show) {
        searchInput.focus();
    } else {
        searchResults.innerHTML = '';
        searchInput.value = '';
    }
}

function performSearch(query) {
    const results = [];
    const needle = query.toLowerCase();

    Object.entries(searchData.pages).forEach(([pageNum, text]) => {
        const haystack = text.toLowerCase();
        const index = haystack.indexOf(needle);
        if (index === -1) return;
        const start = Math.max(0, index - 50);
        const end = Math.min(text.length, index + query.length + 50);
        let snippet = (start > 0 ? '…' : '') + text.substring(start, end) + (end < text.length ? '…' : '');
        snippet = snippet.replace(new RegExp('(' + query.replace(/[.*+?^${}()|[\]\\]/g, '\\$&') + ')', 'gi'),
            '<span class="search-highlight">$1</span>');
        results.push({ page: parseInt(pageNum, 10), snippet });
    });

    results.sort((a, b) => a.page - b.page);
    searchResults.innerHTML = results.length === 0
        ? '<p>No results</p>'
        : results.map(r =>
            '<div class="search-result-item" data-page="' + r.page + '">' +
            '<div class="search-result-page">Page ' + r.page + '</div>' +
            '<div class="search-result-snippet">' + r.snippet + '</div></div>').join('');

    searchResults.querySelectorAll('.search-result-item').forEach(item => {
        item.addEventListener('click', () => {
            goToPage(parseInt(item.dataset.page, 10));
            toggleSearch();
        });
    });
}

on('search-btn', 'click', toggleSearch);
on('search-close-btn', 'click', toggleSearch);
searchOverlay.addEventListener('click', e => {
    if (e.target === searchOverlay) toggleSearch();
});
searchInput.addEventListener('input', e => {
    const query = e.target.value.trim();
    if (query.length >= 2) {
        performSearch(query);
    } else {
        searchResults.innerHTML = '';
    }
});
"#;

/// Page-menu snippet, appended when the sidebar menu is enabled.
pub const VIEWER_JS_MENU: &str = r#"
const menuOverlay = document.getElementById('menu-overlay');

function toggleMenu() {
    menuOverlay.style.display = menuOverlay.style.display === 'none' ? 'flex' : 'none';
}

on('menu-btn', 'click', toggleMenu);
on('menu-close-btn', 'click', toggleMenu);
menuOverlay.addEventListener('click', e => {
    if (e.target === menuOverlay) toggleMenu();
});
menuOverlay.querySelectorAll('[data-page]').forEach(link => {
    link.addEventListener('click', e => {
        e.preventDefault();
        goToPage(parseInt(link.dataset.page, 10));
        toggleMenu();
    });
});
"#;

/// Download-button snippet; `pdfFileName` is declared inline in the HTML.
pub const VIEWER_JS_DOWNLOAD: &str = r#"
on('download-btn', 'click', () => {
    const link = document.createElement('a');
    link.href = pdfFileName;
    link.download = pdfFileName;
    link.click();
});
"#;
