//! Seed dataset for the mock service.
//!
//! Timestamps are generated relative to "now" so the data always looks
//! recent in the demo UI.

use chrono::{DateTime, Duration, Utc};

use crate::auth::{Plan, User};
use crate::catalog::{Technology, TranslationRoute};
use crate::dashboard::{
    ActivityKind, DashboardOverview, DashboardStats, RecentActivity, Recommendation,
    RecommendationKind, SkillProgress, Trend,
};
use crate::learning::{
    CodeExample, Difficulty, LearningPath, Lesson, LessonType, PathStatus, TechnologyLevel,
};
use crate::repo::{
    DetectedPackage, LanguageShare, RepoMetrics, RepoStatus, Repository, Technologies,
};
use crate::skills::{LearningVelocity, Skill, SkillCategory, SkillExperience, SkillProfile};
use crate::translation::{PackageChange, PatternExample, TranslationPattern};

fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

pub fn seed_user() -> User {
    User {
        id: "u-1".into(),
        username: "mira-dev".into(),
        email: "mira-dev@example.com".into(),
        avatar_url: "/avatar.jpg".into(),
        plan: Plan::Pro,
        created_at: days_ago(200),
        skill_profile_id: Some("sp-1".into()),
        repositories_count: 5,
    }
}

pub fn seed_repositories() -> Vec<Repository> {
    vec![
        Repository {
            id: "repo-1".into(),
            name: "react-todo-app".into(),
            full_name: "mira-dev/react-todo-app".into(),
            github_url: "https://github.com/mira-dev/react-todo-app".into(),
            branch: "main".into(),
            status: RepoStatus::Completed,
            created_at: days_ago(14),
            analyzed_at: Some(days_ago(14)),
            technologies: Technologies {
                languages: vec![
                    LanguageShare {
                        name: "JavaScript".into(),
                        percentage: 78.5,
                    },
                    LanguageShare {
                        name: "CSS".into(),
                        percentage: 15.2,
                    },
                    LanguageShare {
                        name: "HTML".into(),
                        percentage: 6.3,
                    },
                ],
                frameworks: vec!["React".into(), "Create React App".into()],
                packages: vec![
                    DetectedPackage {
                        name: "react".into(),
                        version: "18.2.0".into(),
                    },
                    DetectedPackage {
                        name: "react-dom".into(),
                        version: "18.2.0".into(),
                    },
                    DetectedPackage {
                        name: "styled-components".into(),
                        version: "5.3.0".into(),
                    },
                ],
            },
            metrics: Some(RepoMetrics {
                complexity: 6.5,
                quality: 8.2,
                last_commit: days_ago(15),
                total_commits: 47,
                contributors: 2,
            }),
        },
        Repository {
            id: "repo-2".into(),
            name: "nextjs-dashboard".into(),
            full_name: "mira-dev/nextjs-dashboard".into(),
            github_url: "https://github.com/mira-dev/nextjs-dashboard".into(),
            branch: "main".into(),
            status: RepoStatus::Completed,
            created_at: days_ago(16),
            analyzed_at: Some(days_ago(16)),
            technologies: Technologies {
                languages: vec![
                    LanguageShare {
                        name: "TypeScript".into(),
                        percentage: 82.1,
                    },
                    LanguageShare {
                        name: "CSS".into(),
                        percentage: 12.4,
                    },
                    LanguageShare {
                        name: "JavaScript".into(),
                        percentage: 5.5,
                    },
                ],
                frameworks: vec!["Next.js".into(), "React".into()],
                packages: vec![
                    DetectedPackage {
                        name: "next".into(),
                        version: "14.0.0".into(),
                    },
                    DetectedPackage {
                        name: "react".into(),
                        version: "18.2.0".into(),
                    },
                    DetectedPackage {
                        name: "tailwindcss".into(),
                        version: "3.3.0".into(),
                    },
                ],
            },
            metrics: Some(RepoMetrics {
                complexity: 8.1,
                quality: 9.0,
                last_commit: days_ago(17),
                total_commits: 89,
                contributors: 3,
            }),
        },
        Repository {
            id: "repo-3".into(),
            name: "express-api".into(),
            full_name: "mira-dev/express-api".into(),
            github_url: "https://github.com/mira-dev/express-api".into(),
            branch: "main".into(),
            status: RepoStatus::Analyzing,
            created_at: days_ago(1),
            analyzed_at: None,
            technologies: Technologies {
                languages: vec![
                    LanguageShare {
                        name: "JavaScript".into(),
                        percentage: 85.0,
                    },
                    LanguageShare {
                        name: "JSON".into(),
                        percentage: 15.0,
                    },
                ],
                frameworks: vec!["Express.js".into()],
                packages: vec![
                    DetectedPackage {
                        name: "express".into(),
                        version: "4.18.0".into(),
                    },
                    DetectedPackage {
                        name: "mongoose".into(),
                        version: "7.0.0".into(),
                    },
                ],
            },
            metrics: None,
        },
    ]
}

pub fn seed_skill_profile() -> SkillProfile {
    let skill = |technology: &str,
                 category: SkillCategory,
                 proficiency: f64,
                 projects: u32,
                 lines: u64,
                 confidence: f64| Skill {
        technology: technology.into(),
        category,
        proficiency,
        experience: SkillExperience {
            first_seen: days_ago(900),
            last_used: days_ago(1),
            project_count: projects,
            total_lines: lines,
        },
        confidence,
    };

    SkillProfile {
        id: "sp-1".into(),
        user_id: "u-1".into(),
        skills: vec![
            skill("JavaScript", SkillCategory::Language, 8.5, 12, 15_420, 0.95),
            skill("React", SkillCategory::Framework, 8.0, 8, 12_340, 0.92),
            skill("TypeScript", SkillCategory::Language, 6.5, 4, 5_680, 0.85),
            skill("Next.js", SkillCategory::Framework, 7.5, 3, 8_920, 0.88),
            skill("CSS", SkillCategory::Language, 7.0, 10, 6_750, 0.90),
        ],
        strengths: vec![
            "Modern React patterns (hooks, context)".into(),
            "Component architecture".into(),
            "State management".into(),
            "API integration".into(),
        ],
        learning_velocity: LearningVelocity {
            fast_learners: vec!["Next.js".into(), "React".into()],
            steady_progress: vec!["TypeScript".into(), "Node.js".into()],
            recent_focus: vec!["TypeScript".into(), "Testing".into()],
        },
        updated_at: days_ago(1),
    }
}

pub fn seed_learning_paths() -> Vec<LearningPath> {
    let mut path = LearningPath {
        id: "lp-1".into(),
        title: "From Next.js to Vite: A Personalized Journey".into(),
        from: TechnologyLevel {
            technology: "Next.js".into(),
            proficiency: 7.5,
        },
        to: TechnologyLevel {
            technology: "Vite".into(),
            proficiency: 8.0,
        },
        estimated_duration: "4 weeks".into(),
        difficulty: Difficulty::Intermediate,
        prerequisites: vec!["React basics".into(), "JavaScript ES6+".into()],
        lessons: vec![
            Lesson {
                id: "lesson-1".into(),
                order: 1,
                title: "Why Vite? Understanding the differences from Next.js".into(),
                description: "The fundamental differences between Next.js and Vite, and when to pick each.".into(),
                estimated_time: 45,
                lesson_type: LessonType::Concept,
                objectives: vec![
                    "Understand Vite's build philosophy".into(),
                    "Compare development experience".into(),
                    "Identify migration benefits".into(),
                ],
                content: "# Why Vite?\n\nVite takes a fundamentally different approach to build tooling...".into(),
                examples: vec![CodeExample {
                    title: "Development Server Speed".into(),
                    before: "// Next.js dev server startup\nnpm run dev # 10-15 seconds".into(),
                    after: "// Vite dev server startup\nnpm run dev # 2-3 seconds".into(),
                    explanation: "Vite serves native ES modules and pre-bundles with esbuild".into(),
                }],
                exercises: vec![],
                completed: true,
                completed_at: Some(days_ago(3)),
            },
            Lesson {
                id: "lesson-2".into(),
                order: 2,
                title: "Project setup and configuration".into(),
                description: "Create a Vite project and work through vite.config.ts.".into(),
                estimated_time: 60,
                lesson_type: LessonType::Practice,
                objectives: vec![
                    "Create a new Vite project".into(),
                    "Understand vite.config.ts".into(),
                    "Configure plugins and aliases".into(),
                ],
                content: "# Project Setup\n\nLet's create your first Vite project...".into(),
                examples: vec![],
                exercises: vec![],
                completed: true,
                completed_at: Some(days_ago(2)),
            },
            Lesson {
                id: "lesson-3".into(),
                order: 3,
                title: "React Router setup and configuration".into(),
                description: "Replace file-based routing with explicit React Router routes.".into(),
                estimated_time: 75,
                lesson_type: LessonType::Practice,
                objectives: vec![
                    "Install and configure React Router".into(),
                    "Create route definitions".into(),
                    "Handle dynamic routes".into(),
                ],
                content: "# React Router Configuration\n\nUnlike Next.js file-based routing...".into(),
                examples: vec![CodeExample {
                    title: "Route Configuration".into(),
                    before: "// Next.js pages/users/[id].tsx\nexport default function UserPage() { /* ... */ }".into(),
                    after: "// React Router route definition\n<Route path=\"/users/:id\" element={<UserPage />} />".into(),
                    explanation: "React Router uses explicit route configuration".into(),
                }],
                exercises: vec![],
                completed: false,
                completed_at: None,
            },
        ],
        progress: 0,
        status: PathStatus::Active,
        created_at: days_ago(4),
        updated_at: days_ago(2),
    };
    path.progress = path.computed_progress();
    vec![path]
}

pub fn seed_dashboard() -> DashboardOverview {
    DashboardOverview {
        stats: DashboardStats {
            repositories_analyzed: 5,
            translations_completed: 12,
            learning_paths_active: 2,
            skills_tracked: 8,
        },
        recent_activity: vec![
            RecentActivity {
                kind: ActivityKind::Translation,
                title: "Translated Next.js component to Vite".into(),
                timestamp: days_ago(0),
                metadata: serde_json::json!({
                    "confidence": 0.94,
                    "framework": "Next.js → Vite",
                }),
            },
            RecentActivity {
                kind: ActivityKind::Learning,
                title: "Completed lesson: Project setup and configuration".into(),
                timestamp: days_ago(2),
                metadata: serde_json::json!({
                    "lesson": "lesson-2",
                    "path": "Next.js to Vite",
                }),
            },
            RecentActivity {
                kind: ActivityKind::Analysis,
                title: "Analyzed express-api repository".into(),
                timestamp: days_ago(1),
                metadata: serde_json::json!({
                    "repository": "express-api",
                    "technologies": ["Express.js", "MongoDB"],
                }),
            },
        ],
        skill_progress: vec![
            SkillProgress {
                technology: "TypeScript".into(),
                previous_level: 6.0,
                current_level: 6.5,
                trend: Trend::Improving,
            },
            SkillProgress {
                technology: "React".into(),
                previous_level: 8.0,
                current_level: 8.0,
                trend: Trend::Stable,
            },
            SkillProgress {
                technology: "Vite".into(),
                previous_level: 2.0,
                current_level: 5.8,
                trend: Trend::Improving,
            },
        ],
        recommendations: vec![
            Recommendation {
                kind: RecommendationKind::Learning,
                title: "Complete TypeScript Advanced Patterns".into(),
                description: "Advanced TypeScript would boost your recent projects".into(),
                action: "Start Learning Path".into(),
                link: "/learn/typescript-advanced".into(),
            },
            Recommendation {
                kind: RecommendationKind::Translation,
                title: "Migrate Express API to NestJS".into(),
                description: "Your Express.js code could benefit from NestJS structure".into(),
                action: "Start Translation".into(),
                link: "/translate?from=express&to=nestjs".into(),
            },
        ],
    }
}

pub fn seed_technologies() -> Vec<Technology> {
    vec![
        Technology {
            name: "react".into(),
            display_name: "React".into(),
            category: "framework".into(),
            description: "A JavaScript library for building user interfaces".into(),
            popularity: 95,
            related: vec!["nextjs".into(), "vite".into(), "typescript".into()],
        },
        Technology {
            name: "nextjs".into(),
            display_name: "Next.js".into(),
            category: "framework".into(),
            description: "Full-stack React framework with built-in optimizations".into(),
            popularity: 88,
            related: vec!["react".into(), "vite".into(), "vercel".into()],
        },
        Technology {
            name: "vite".into(),
            display_name: "Vite".into(),
            category: "build-tool".into(),
            description: "Fast build tool and development server".into(),
            popularity: 75,
            related: vec!["react".into(), "vue".into(), "rollup".into()],
        },
        Technology {
            name: "typescript".into(),
            display_name: "TypeScript".into(),
            category: "language".into(),
            description: "Typed superset of JavaScript".into(),
            popularity: 85,
            related: vec!["javascript".into(), "react".into(), "nodejs".into()],
        },
    ]
}

pub fn seed_patterns() -> Vec<TranslationPattern> {
    vec![
        TranslationPattern {
            id: "pattern-1".into(),
            source_pattern: "useRouter hook".into(),
            target_pattern: "useNavigate + useLocation".into(),
            description: "Convert Next.js useRouter to React Router equivalents".into(),
            usage_count: 156,
            success_rate: 0.98,
            examples: vec![PatternExample {
                before: "const router = useRouter(); router.push(\"/dashboard\");".into(),
                after: "const navigate = useNavigate(); navigate(\"/dashboard\");".into(),
            }],
        },
        TranslationPattern {
            id: "pattern-2".into(),
            source_pattern: "getServerSideProps".into(),
            target_pattern: "useQuery hook".into(),
            description: "Convert Next.js server-side data fetching to client-side React Query"
                .into(),
            usage_count: 89,
            success_rate: 0.91,
            examples: vec![PatternExample {
                before: "export const getServerSideProps = async (context) => { /* ... */ }".into(),
                after: "const { data, isLoading } = useQuery({ queryKey: [...], queryFn: ... });"
                    .into(),
            }],
        },
    ]
}

pub fn seed_routes() -> Vec<TranslationRoute> {
    vec![
        TranslationRoute {
            from: "React".into(),
            to: "TypeScript React".into(),
            supported: true,
            confidence: 0.95,
            examples_count: 156,
            common_use_cases: vec![
                "Type safety".into(),
                "Better IDE support".into(),
                "Code documentation".into(),
            ],
        },
        TranslationRoute {
            from: "Next.js".into(),
            to: "Vite React".into(),
            supported: true,
            confidence: 0.88,
            examples_count: 89,
            common_use_cases: vec![
                "Faster builds".into(),
                "Simpler configuration".into(),
                "Modern tooling".into(),
            ],
        },
        TranslationRoute {
            from: "Express.js".into(),
            to: "NestJS".into(),
            supported: true,
            confidence: 0.82,
            examples_count: 67,
            common_use_cases: vec![
                "Better architecture".into(),
                "TypeScript support".into(),
                "Dependency injection".into(),
            ],
        },
    ]
}

/// Canned target-side output grafted onto every translation response.
pub fn sample_translation_target() -> (String, Vec<String>, Vec<PackageChange>) {
    let code = r#"// Vite React component with React Query
import { useParams, useNavigate } from 'react-router-dom';
import { useQuery } from '@tanstack/react-query';

export default function UserProfile() {
  const { id } = useParams();
  const navigate = useNavigate();

  const { data: user, isLoading, error } = useQuery({
    queryKey: ['user', id],
    queryFn: async () => {
      const res = await fetch(`/api/users/${id}`);
      if (!res.ok) throw new Error('Failed to fetch user');
      return res.json();
    },
    enabled: !!id
  });

  if (isLoading) return <div>Loading...</div>;
  if (error) return <div>Error loading user</div>;
  if (!user) return <div>User not found</div>;

  return (
    <div>
      <h1>{user.name}</h1>
      <p>{user.email}</p>
      <button onClick={() => navigate('/dashboard')}>
        Back to Dashboard
      </button>
    </div>
  );
}"#;
    let packages = vec![
        "react".to_string(),
        "react-router-dom".to_string(),
        "@tanstack/react-query".to_string(),
    ];
    let changes = vec![
        PackageChange {
            from: "next".into(),
            to: "react-router-dom".into(),
            version: "^6.20.0".into(),
        },
        PackageChange {
            from: String::new(),
            to: "@tanstack/react-query".into(),
            version: "^5.8.0".into(),
        },
    ];
    (code.to_string(), packages, changes)
}
