//! Static word lists used by the abbreviator.

/// Generic words dropped from display names.
pub const NOISE_WORDS: &[&str] = &[
    "a",
    "an",
    "and",
    "api",
    "by",
    "controller",
    "endpoint",
    "for",
    "handler",
    "impl",
    "of",
    "operation",
    "resource",
    "service",
    "the",
    "to",
    "using",
    "with",
];

/// Word replacements, sorted by the long form.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("account", "acct"),
    ("accounts", "accts"),
    ("address", "addr"),
    ("administrator", "admin"),
    ("application", "app"),
    ("applications", "apps"),
    ("attribute", "attr"),
    ("attributes", "attrs"),
    ("authentication", "authn"),
    ("authorization", "authz"),
    ("calculate", "calc"),
    ("certificate", "cert"),
    ("certificates", "certs"),
    ("command", "cmd"),
    ("configuration", "config"),
    ("configurations", "configs"),
    ("connection", "conn"),
    ("connections", "conns"),
    ("credentials", "creds"),
    ("database", "db"),
    ("definition", "def"),
    ("definitions", "defs"),
    ("deployment", "deploy"),
    ("deployments", "deploys"),
    ("description", "desc"),
    ("destination", "dest"),
    ("directory", "dir"),
    ("document", "doc"),
    ("documents", "docs"),
    ("environment", "env"),
    ("environments", "envs"),
    ("expression", "expr"),
    ("generate", "gen"),
    ("identifier", "id"),
    ("identifiers", "ids"),
    ("implementation", "impl"),
    ("information", "info"),
    ("initialize", "init"),
    ("instance", "inst"),
    ("instances", "insts"),
    ("management", "mgmt"),
    ("maximum", "max"),
    ("message", "msg"),
    ("messages", "msgs"),
    ("minimum", "min"),
    ("notification", "notif"),
    ("notifications", "notifs"),
    ("number", "num"),
    ("object", "obj"),
    ("organization", "org"),
    ("organizations", "orgs"),
    ("parameter", "param"),
    ("parameters", "params"),
    ("password", "pwd"),
    ("permission", "perm"),
    ("permissions", "perms"),
    ("previous", "prev"),
    ("properties", "props"),
    ("property", "prop"),
    ("reference", "ref"),
    ("references", "refs"),
    ("repositories", "repos"),
    ("repository", "repo"),
    ("request", "req"),
    ("requests", "reqs"),
    ("response", "resp"),
    ("responses", "resps"),
    ("source", "src"),
    ("specification", "spec"),
    ("statistics", "stats"),
    ("subscription", "sub"),
    ("subscriptions", "subs"),
    ("template", "tmpl"),
    ("templates", "tmpls"),
    ("temporary", "temp"),
    ("transaction", "txn"),
    ("transactions", "txns"),
    ("utility", "util"),
    ("variable", "var"),
    ("variables", "vars"),
    ("version", "ver"),
    ("versions", "vers"),
];

/// Words never stripped of vowels.
pub const PROTECTED_ACRONYMS: &[&str] = &[
    "api", "csv", "dns", "html", "http", "https", "id", "ip", "json", "jwt", "oauth", "pdf", "sql",
    "ssh", "tls", "uri", "url", "uuid", "xml", "yaml",
];

pub fn is_noise(word: &str) -> bool {
    NOISE_WORDS.contains(&word)
}

pub fn abbreviation_for(word: &str) -> Option<&'static str> {
    ABBREVIATIONS
        .binary_search_by(|(long, _)| long.cmp(&word))
        .ok()
        .map(|i| ABBREVIATIONS[i].1)
}

pub fn is_protected(word: &str) -> bool {
    PROTECTED_ACRONYMS.contains(&word)
}
