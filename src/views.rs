//! Server-rendered library pages

use crate::models::book::{Book, BookDetails};

/// Escape text for interpolation into HTML
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/library/fluid_grid.css">
  <link rel="stylesheet" href="/library/styles.css">
</head>
<body>
  <header class="masthead">
    <a href="/library">Library</a>
    <a href="/library/books">Catalog</a>
  </header>
  <main class="gridContainer">
{body}
  </main>
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

fn cover(book: &Book) -> String {
    format!(
        r#"<img class="cover" src="{src}" alt="{alt}">"#,
        src = escape(&book.imgurl),
        alt = escape(&book.title)
    )
}

/// Landing page
pub fn index_page() -> String {
    layout(
        "Library",
        r#"    <section class="welcome">
      <h1>Welcome to the Library</h1>
      <p>Browse the <a href="/library/books">catalog</a> to see which books are on the shelf.</p>
    </section>"#,
    )
}

/// Listing of every book passed in
pub fn books_page(books: &[Book]) -> String {
    let body = if books.is_empty() {
        "    <p class=\"empty\">No books match this search.</p>".to_string()
    } else {
        let cards: Vec<String> = books
            .iter()
            .map(|book| {
                format!(
                    r#"      <li class="book fluid">
        <a href="/library/books/{id}">{cover}</a>
        <h2><a href="/library/books/{id}">{title}</a></h2>
        <p class="author">{author}</p>
        <p class="genre">{genre}</p>
      </li>"#,
                    id = book.id,
                    cover = cover(book),
                    title = escape(&book.title),
                    author = escape(&book.author),
                    genre = escape(&book.genre)
                )
            })
            .collect();
        format!(
            "    <h1>Catalog</h1>\n    <ul class=\"books\">\n{}\n    </ul>",
            cards.join("\n")
        )
    };

    layout("Catalog", &body)
}

/// Detail page for a single book with its copy counts
pub fn book_page(details: &BookDetails) -> String {
    let book = &details.book;
    let rows: Vec<String> = book
        .copies
        .iter()
        .map(|copy| {
            let status = if copy.checked.available { "Available" } else { "Checked out" };
            let reserved = if copy.reserved.reserved { "Reserved" } else { "" };
            format!(
                "          <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&copy.id),
                status,
                reserved
            )
        })
        .collect();

    let body = format!(
        r#"    <article class="book-detail">
      {cover}
      <h1>{title}</h1>
      <p class="author">{author}</p>
      <p class="genre">{genre}</p>
      <p class="publication">{publisher}, {date} ({edition})</p>
      <p class="availability">{available} of {total} copies available</p>
      <table class="copies">
        <thead><tr><th>Copy</th><th>Status</th><th>Reservation</th></tr></thead>
        <tbody>
{rows}
        </tbody>
      </table>
    </article>"#,
        cover = cover(book),
        title = escape(&book.title),
        author = escape(&book.author),
        genre = escape(&book.genre),
        publisher = escape(&book.publication.publisher),
        date = escape(&book.publication.date),
        edition = escape(&book.publication.edition),
        available = details.available_copy_count,
        total = details.copy_count,
        rows = rows.join("\n")
    );

    layout(&book.title, &body)
}
