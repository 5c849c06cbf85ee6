//! Keyword/framework detection over free text (project descriptions, job postings).
//!
//! Detection is a fixed, ordered pattern table. Each entry maps a case-insensitive
//! regex to the canonical skill it evidences. No interpretation beyond that.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Skills every user with a synced repository is assumed to have.
pub const BASELINE_SKILLS: &[&str] = &["git", "version control", "github"];

const DETECTION_PATTERNS: &[(&str, &str)] = &[
    ("React", r"\breact(\.js|js)?\b"),
    ("React Native", r"\breact[- ]native\b"),
    ("Next.js", r"\bnext\.?js\b"),
    ("Vue", r"\bvue(\.js|js)?\b"),
    ("Angular", r"\bangular\b"),
    ("Svelte", r"\bsvelte\b"),
    ("Redux", r"\bredux\b"),
    ("Tailwind CSS", r"\btailwind(css)?\b"),
    ("Responsive Design", r"\bresponsive\b|mobile[- ]first|media quer(y|ies)|\bmobile[- ]friendly\b"),
    ("Accessibility", r"\baccessib(le|ility)\b|\ba11y\b|\baria\b"),
    ("Node.js", r"\bnode(\.js|js)?\b"),
    ("Express", r"\bexpress(\.js|js)?\b"),
    ("REST API", r"\brest(ful)?\b|\brest api\b"),
    ("GraphQL", r"\bgraphql\b|\bapollo\b"),
    ("WebSockets", r"\bweb ?sockets?\b|socket\.io|\breal[- ]?time\b"),
    ("Authentication", r"\bauth(entication|orization)?\b|\bjwt\b|\boauth2?\b|\blogin\b"),
    ("SQL", r"\bsql\b|\bpostgres(ql)?\b|\bmysql\b|\bsqlite\b"),
    ("PostgreSQL", r"\bpostgres(ql)?\b"),
    ("MongoDB", r"\bmongo(db)?\b|\bmongoose\b"),
    ("Redis", r"\bredis\b"),
    ("Databases", r"\bdatabases?\b|\bsql\b|\bmongo(db)?\b|\bpostgres(ql)?\b"),
    ("Caching", r"\bcach(e|ing)\b"),
    ("Docker", r"\bdocker(file)?\b|\bcontaineri[sz]ed\b"),
    ("Kubernetes", r"\bkubernetes\b|\bk8s\b|\bhelm\b"),
    ("CI/CD", r"\bci/cd\b|\bgithub actions\b|\bcontinuous (integration|delivery|deployment)\b"),
    ("Terraform", r"\bterraform\b"),
    ("Cloud", r"\baws\b|\bgcp\b|\bazure\b|\bcloud\b"),
    ("Linux", r"\blinux\b|\bubuntu\b"),
    ("Monitoring", r"\bmonitoring\b|\bprometheus\b|\bgrafana\b"),
    ("Testing", r"\btest(s|ing|ed)?\b|\bjest\b|\bpytest\b|\bcypress\b|\bvitest\b"),
    ("Django", r"\bdjango\b"),
    ("Flask", r"\bflask\b"),
    ("FastAPI", r"\bfastapi\b"),
    ("Pandas", r"\bpandas\b"),
    ("NumPy", r"\bnumpy\b"),
    ("Data Visualization", r"\bdata visuali[sz]ation\b|\bdashboards?\b|\bcharts?\b|\bmatplotlib\b|\bd3(\.js)?\b"),
    ("Machine Learning", r"\bmachine learning\b|\bml\b|\bscikit-learn\b|\bsklearn\b"),
    ("PyTorch", r"\bpytorch\b"),
    ("TensorFlow", r"\btensorflow\b|\bkeras\b"),
    ("Microservices", r"\bmicro-?services?\b"),
    ("Message Queues", r"\bkafka\b|\brabbitmq\b|\bmessage queues?\b|\bpub/?sub\b"),
    ("State Management", r"\bstate management\b|\bredux\b|\bzustand\b|\bmobx\b"),
];

/// Languages recognized by name in job postings.
const LANGUAGE_PATTERNS: &[(&str, &str)] = &[
    ("JavaScript", r"\bjavascript\b|\bjs\b|\becmascript\b"),
    ("TypeScript", r"\btypescript\b|\bts\b"),
    ("Python", r"\bpython\b"),
    ("Java", r"\bjava\b"),
    ("Go", r"\bgolang\b|(?-i:\bGo\b)"),
    ("Rust", r"\brust\b"),
    ("Ruby", r"\bruby\b"),
    ("PHP", r"\bphp\b"),
    ("C#", r"c#|\bcsharp\b"),
    ("C++", r"c\+\+|\bcpp\b"),
    ("Kotlin", r"\bkotlin\b"),
    ("Swift", r"\bswift\b"),
    ("HTML", r"\bhtml5?\b"),
    ("CSS", r"\bcss3?\b|\bscss\b|\bsass\b"),
    ("Bash", r"\bbash\b|\bshell script(ing)?\b"),
];

struct Pattern {
    skill: &'static str,
    regex: Regex,
}

fn compile(table: &[(&'static str, &str)]) -> Vec<Pattern> {
    table
        .iter()
        .filter_map(|(skill, pattern)| {
            // Bad patterns are logged and dropped.
            Regex::new(&format!("(?i){pattern}"))
                .map(|regex| Pattern { skill: *skill, regex })
                .map_err(|e| tracing::error!("invalid detection pattern for {skill}: {e}"))
                .ok()
        })
        .collect()
}

static FRAMEWORK_MATCHERS: Lazy<Vec<Pattern>> = Lazy::new(|| compile(DETECTION_PATTERNS));
static LANGUAGE_MATCHERS: Lazy<Vec<Pattern>> = Lazy::new(|| compile(LANGUAGE_PATTERNS));

/// Skills evidenced by `text`, in pattern-table order, without duplicates.
pub fn detect_skills(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    FRAMEWORK_MATCHERS
        .iter()
        .filter(|p| p.regex.is_match(text))
        .map(|p| p.skill.to_string())
        .collect()
}

/// Required skills named in a job posting, ordered by first appearance.
///
/// Combines the framework table with the language table so that plain
/// "5+ years of Python" mentions are picked up as well.
pub fn required_skills_from_description(text: &str) -> Vec<String> {
    let mut hits: Vec<(usize, &'static str)> = FRAMEWORK_MATCHERS
        .iter()
        .chain(LANGUAGE_MATCHERS.iter())
        .filter_map(|p| p.regex.find(text).map(|m| (m.start(), p.skill)))
        .collect();
    // Stable: equal positions keep table order.
    hits.sort_by_key(|(position, _)| *position);

    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|(_, skill)| seen.insert(*skill))
        .map(|(_, skill)| skill.to_string())
        .collect()
}
