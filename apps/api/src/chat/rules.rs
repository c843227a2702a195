//! Deterministic fallback responder: keyword-matched canned answers.
//!
//! CRITICAL: this is the terminal link of the provider chain. It performs no I/O,
//! cannot fail, and returns non-empty text for every input, including empty input.
//!
//! Classification walks `INTENT_RULES` and picks the matching rule with the lowest
//! priority number. Role-fit outranks everything because its phrasing also hits
//! the skills and experience keywords.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    RoleFit,
    Skills,
    Experience,
    Behavioral,
    Education,
    RoleReadiness,
    Compensation,
    CareerGaps,
    SystemDesign,
    Greeting,
    Bio,
    Contact,
    Resume,
    Default,
}

/// One row of the classification table.
pub struct IntentRule {
    pub category: IntentCategory,
    /// Lower wins when several rules match.
    pub priority: u8,
    /// Receives the lower-cased query.
    pub matches: fn(&str) -> bool,
    pub response: &'static str,
}

fn contains_any(query: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| query.contains(n))
}

fn is_role_fit(q: &str) -> bool {
    contains_any(
        q,
        &[
            "full stack developer",
            "full-stack developer",
            "fullstack developer",
            "does this profile match",
            "profile matches",
        ],
    ) || (q.contains("looking for") && q.contains("developer"))
        || (q.contains("requirements") && q.contains("profile"))
}

fn is_skills(q: &str) -> bool {
    contains_any(
        q,
        &[
            "skills", "tech stack", "frameworks", "react", "java", "spring", "frontend",
            "backend", "database", "cloud", "devops", "ci/cd", "microservices", "api",
            "proficiency",
        ],
    )
}

fn is_experience(q: &str) -> bool {
    contains_any(
        q,
        &[
            "experience", "projects", "work", "career", "professional", "companies",
            "deloitte", "nisum", "infosys", "achievements", "impact", "metrics", "kpi",
            "success", "challenges",
        ],
    )
}

fn is_behavioral(q: &str) -> bool {
    contains_any(
        q,
        &[
            "teamwork", "leadership", "communication", "handle", "approach", "mentored",
            "describe you", "stay up to date", "problems",
        ],
    )
}

fn is_education(q: &str) -> bool {
    contains_any(
        q,
        &[
            "education", "degree", "college", "university", "certification", "certified",
            "aws", "azure", "b.tech", "learning", "thesis", "capstone",
        ],
    )
}

fn is_role_readiness(q: &str) -> bool {
    contains_any(
        q,
        &[
            "fit", "role", "position", "readiness", "gaps", "plan", "map", "outcomes",
            "engineer", "architect", "lead", "manager",
        ],
    )
}

fn is_compensation(q: &str) -> bool {
    contains_any(
        q,
        &[
            "salary", "compensation", "offer", "negotiation", "minimum", "evaluate",
            "package", "ctc",
        ],
    )
}

fn is_career_gap(q: &str) -> bool {
    contains_any(
        q,
        &["gap", "break", "transition", "personal projects", "narrative", "story"],
    )
}

fn is_system_design(q: &str) -> bool {
    contains_any(
        q,
        &[
            "system design", "architecture", "scalability", "design", "patterns",
            "distributed", "microservices", "idempotency", "backpressure",
        ],
    )
}

const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "greetings"];
const GREETING_PHRASES: &[&str] = &["good morning", "good afternoon", "good evening"];

fn is_greeting(q: &str) -> bool {
    let q = q.trim_start();
    let first_word = q
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or_default();
    GREETING_WORDS.contains(&first_word) || GREETING_PHRASES.iter().any(|p| q.starts_with(p))
}

fn is_bio(q: &str) -> bool {
    contains_any(
        q,
        &["who is", "tell me about", "about veera", "what is his name", "overview"],
    )
}

fn is_contact(q: &str) -> bool {
    contains_any(
        q,
        &["contact", "email", "phone", "reach", "connect", "available"],
    )
}

fn is_resume(q: &str) -> bool {
    contains_any(q, &["resume", "cv", "download resume", "summary"])
}

pub static INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        category: IntentCategory::RoleFit,
        priority: 0,
        matches: is_role_fit,
        response: ROLE_FIT_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::Skills,
        priority: 1,
        matches: is_skills,
        response: SKILLS_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::Experience,
        priority: 2,
        matches: is_experience,
        response: EXPERIENCE_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::Behavioral,
        priority: 3,
        matches: is_behavioral,
        response: BEHAVIORAL_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::Education,
        priority: 4,
        matches: is_education,
        response: EDUCATION_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::RoleReadiness,
        priority: 5,
        matches: is_role_readiness,
        response: ROLE_READINESS_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::Compensation,
        priority: 6,
        matches: is_compensation,
        response: COMPENSATION_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::CareerGaps,
        priority: 7,
        matches: is_career_gap,
        response: CAREER_GAPS_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::SystemDesign,
        priority: 8,
        matches: is_system_design,
        response: SYSTEM_DESIGN_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::Greeting,
        priority: 9,
        matches: is_greeting,
        response: GREETING_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::Bio,
        priority: 10,
        matches: is_bio,
        response: BIO_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::Contact,
        priority: 11,
        matches: is_contact,
        response: CONTACT_RESPONSE,
    },
    IntentRule {
        category: IntentCategory::Resume,
        priority: 12,
        matches: is_resume,
        response: RESUME_RESPONSE,
    },
];

/// Picks the highest-priority category whose predicate matches, or `Default`.
pub fn classify_intent(query: &str) -> IntentCategory {
    let query = query.to_lowercase();
    INTENT_RULES
        .iter()
        .filter(|rule| (rule.matches)(&query))
        .min_by_key(|rule| rule.priority)
        .map(|rule| rule.category)
        .unwrap_or(IntentCategory::Default)
}

/// The fixed text block for a category.
pub fn canned_response(category: IntentCategory) -> &'static str {
    INTENT_RULES
        .iter()
        .find(|rule| rule.category == category)
        .map(|rule| rule.response)
        .unwrap_or(DEFAULT_RESPONSE)
}

/// Always-available terminal responder.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedResponder;

impl RuleBasedResponder {
    pub const NAME: &'static str = "Fallback";

    pub fn respond(&self, query: &str) -> &'static str {
        canned_response(classify_intent(query))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Canned responses
// ────────────────────────────────────────────────────────────────────────────

const ROLE_FIT_RESPONSE: &str = "\
**Strong match.** Veera's profile lines up well with Full Stack Developer requirements.

## Core competencies
**Frontend:** React with Redux, Angular with TypeScript, responsive component architecture.
**Backend:** Java and Spring Boot microservices, secure REST API design, caching.
**Cloud & DevOps:** AWS and Azure deployments, Docker, Kubernetes, Jenkins pipelines.

## Relevant experience
• 4+ years of progressive full stack delivery
• VibeCart e-commerce platform serving 10K+ users
• Dell logistics platforms with end-to-end ownership from design to deployment

## Proven impact
• 60% improvement in cloud resource efficiency on the Polycloud platform
• Security remediation and microservices migrations in enterprise teams

Veera is open to new opportunities. Schedule a conversation to explore the fit. \
[[ACTION:openContactForm]] [[NAV:#experience]]";

const SKILLS_RESPONSE: &str = "\
**Technical skills across the full stack:**

## Frontend (about 88% proficiency)
• React ecosystem: Redux, lazy loading, code splitting, TypeScript
• Angular: RxJS, dependency injection, Material Design

## Backend (about 92% proficiency)
• Java and Spring Boot microservices with Spring Cloud
• REST APIs with OpenAPI docs, JWT and OAuth2 security
• Event-driven integration with Kafka

## Data (about 85% proficiency)
• MySQL and PostgreSQL indexing and query tuning
• MongoDB document modelling, Redis caching

## Cloud & DevOps (about 82% proficiency)
• AWS (EC2, S3, Lambda, RDS) and Azure (App Service, Functions)
• Docker, Kubernetes, Jenkins and GitHub Actions pipelines

Veera ships production-ready solutions across the whole stack. [[NAV:#skills]]";

const EXPERIENCE_RESPONSE: &str = "\
**Experience and projects:**

**Consultant, Deloitte USI** (Mar 2025 to present)
• Dell logistics platforms: microservices migration, security remediation, vendor workflows

**Software Engineer, Nisum Technologies** (Jun 2024 to Mar 2025)
• VibeCart e-commerce platform for 10K+ users
• Share Cart and Registry features for Williams-Sonoma

**System Engineer, Infosys** (Jan 2022 to Jun 2024)
• Infosys Polycloud multi-cloud management platform
• 60% better cloud resource efficiency across 8+ enterprise integrations

Each role combined technical depth with measurable business results. \
[[NAV:#experience]] [[NAV:#projects]]";

const BEHAVIORAL_RESPONSE: &str = "\
**Teamwork and leadership:**

• **Collaboration:** works closely with product, QA and operations in distributed teams
• **Communication:** explains trade-offs plainly to technical and business audiences
• **Mentoring:** onboards new engineers through pairing and thorough code reviews
• **Problem solving:** reproduces first, measures second, then fixes the root cause
• **Staying current:** steady certification track and hands-on side projects

Veera builds high-trust teams while keeping delivery on schedule. [[NAV:#about]]";

const EDUCATION_RESPONSE: &str = "\
**Education and certifications:**

• **B.Tech in Mechanical Engineering**, with a move into software through intensive \
full stack training
• **Full Stack Development** program covering Java, React and cloud deployment
• **Cloud certifications** including AWS Cloud Practitioner and Microsoft Azure Fundamentals
• 10+ further certifications across cloud and development topics

Veera pairs solid fundamentals with continuous, certified learning. \
[[NAV:#education]] [[NAV:#certifications]]";

const ROLE_READINESS_RESPONSE: &str = "\
**Role fit and readiness:**

## Ready now
• Senior full stack and backend engineering roles (Java, Spring Boot, React)
• Cloud-focused engineering on AWS or Azure

## Growing into
• Technical lead responsibilities: design reviews, mentoring, delivery planning
• Solution architecture for distributed systems

## First 90 days
Learn the domain and codebase, ship a meaningful improvement early, then take \
ownership of a service or feature area.

Veera shows strong readiness for senior technical roles. [[NAV:#experience]] [[NAV:#skills]]";

const COMPENSATION_RESPONSE: &str = "\
**Compensation approach:**

• Looks at the whole package: growth, learning, team and impact as well as base pay
• Expectations are aligned with market rates for 4+ years of full stack experience
• Open and flexible in discussion, with a preference for transparent conversations

For specific numbers, reach out directly. [[ACTION:openContactForm]] [[NAV:#contact]]";

const CAREER_GAPS_RESPONSE: &str = "\
**Career journey:**

• **2022:** started at Infosys as a System Engineer on cloud platform work
• **2024:** moved to Nisum Technologies for product-scale e-commerce engineering
• **2025:** joined Deloitte USI as a Consultant on enterprise logistics

Every transition was a step up in scope, with no employment gaps and continuous \
skill growth in between. [[NAV:#experience]] [[NAV:#education]]";

const SYSTEM_DESIGN_RESPONSE: &str = "\
**System design experience:**

• **Microservices:** service decomposition, API gateways, feature flags
• **Messaging:** Kafka event streams with idempotent consumers and retry topics
• **Scalability:** horizontal scaling on Kubernetes, Redis caching, read replicas
• **Resilience:** circuit breakers, backpressure and graceful degradation
• **Observability:** structured logs, metrics and tracing wired in from day one

Veera has designed and run scalable, maintainable systems for enterprise clients. \
[[NAV:#projects]] [[NAV:#skills]]";

const GREETING_RESPONSE: &str = "\
Hello! I'm Lumi, Veera's portfolio assistant. I can walk you through his 4+ years of \
experience, technical skills, projects, education and certifications. What would you \
like to explore?";

const BIO_RESPONSE: &str = "\
**Veera Venkata Sai Mane**, Full Stack Developer & Consultant

• Consultant at Deloitte USI, based in Hyderabad, Telangana
• 4+ years building enterprise applications across e-commerce, logistics and cloud
• Specialises in Java full stack development, microservices and cloud deployments

Veera combines technical depth with business sense to deliver high-impact solutions. \
[[NAV:#about]]";

const CONTACT_RESPONSE: &str = "\
**Contact details:**

• Email: venkatsaimane@gmail.com
• Location: Hyderabad, Telangana
• Availability: open to opportunities

Veera welcomes conversations about roles, collaborations and technical topics. \
[[ACTION:openContactForm]] [[NAV:#contact]]";

const RESUME_RESPONSE: &str = "\
**Resume available**

The resume covers Veera's path from System Engineer to Consultant, the main projects \
and their impact, and the certifications earned along the way. Opening it for you now. \
[[ACTION:openResume]]";

const DEFAULT_RESPONSE: &str = "\
I can tell you about Veera's professional profile. Try asking about:

• **Skills:** frontend, backend, cloud and DevOps
• **Experience:** roles at Deloitte, Nisum and Infosys, and key projects
• **Education:** degree and certifications
• **Working style:** teamwork, leadership and problem solving
• **Opportunities:** availability, contact details and role fit

What would you like to explore?";
