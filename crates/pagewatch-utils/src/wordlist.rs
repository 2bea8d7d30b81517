//! Default wordlist for the brute-force technique.

/// Extensions expanded against every wordlist entry.
pub const BRUTEFORCE_EXTENSIONS: [&str; 7] =
    [".php", ".html", ".jsp", ".aspx", ".json", ".xml", ".api"];

/// Common admin/ops paths probed by the brute-force technique.
pub fn default_wordlist() -> Vec<&'static str> {
    vec![
        "admin",
        "login",
        "dashboard",
        "api",
        "test",
        "backup",
        "dev",
        "old",
        "uploads",
        "download",
        "files",
        "images",
        "assets",
        "js",
        "css",
        "config",
        "settings",
        "user",
        "users",
        "account",
        "accounts",
        "profile",
        "search",
        "index",
        "home",
        "about",
        "contact",
        "help",
        "support",
        "blog",
        "news",
        "products",
        "services",
        "docs",
        "documentation",
        "api/v1",
        "api/v2",
        "auth",
        "register",
        "logout",
        "password",
        "reset",
        "forgot",
        "verify",
        "confirm",
        "activate",
        "sitemap",
        "robots",
        "favicon",
        ".git",
        ".env",
        ".htaccess",
        "web.config",
        "package.json",
        "wp-admin",
        "wp-login",
        "admin.php",
        "xmlrpc.php",
        "shell",
        "cmd",
        "execute",
        "upload",
        "file",
        "folder",
        "directory",
        "list",
        "browse",
        "view",
    ]
}

/// Size figures for a wordlist expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordlistStats {
    pub words: usize,
    pub extensions: usize,
    pub estimated_urls: usize,
}

impl WordlistStats {
    /// Estimate the candidate count: base + trailing slash, each
    /// extension, and the three prefixed forms per word.
    pub fn for_words(words: usize) -> Self {
        Self {
            words,
            extensions: BRUTEFORCE_EXTENSIONS.len(),
            estimated_urls: words * (2 + BRUTEFORCE_EXTENSIONS.len() + 3),
        }
    }
}
