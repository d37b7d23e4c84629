//! Sample content for a freshly provisioned database.

use std::sync::Arc;

use kalem::application::error::AppError;
use kalem::application::posts::{PostForm, PostWorkspace, SubmitPost, WorkspaceError};
use kalem::config::{self, SeedArgs, ServeOverrides};
use kalem::domain::entities::AuthorIdentity;
use kalem::infra::db::PostgresRepositories;
use kalem::infra::telemetry;
use tracing::{info, warn};

const SAMPLE_POSTS: &[(&str, &str, &str)] = &[
    (
        "Kapadokya'nın Büyülü Peri Bacaları",
        "Milyonlarca yıllık volkanik kayaların rüzgârla yonttuğu vadiler.",
        "# Peri Bacaları\n\nGün doğumunda balonlar vadinin üzerinde süzülürken \
         kayaların rengi pembeden altına döner.\n\n**Görülmesi gerekenler:**\n\n\
         - Göreme Açık Hava Müzesi\n- Paşabağ Vadisi\n- Uçhisar Kalesi",
    ),
    (
        "Pamukkale Travertenlerinde Bir Gün",
        "Kalsiyum karbonat içerikli suların yamaçta ördüğü bembeyaz teraslar.",
        "# Travertenler\n\nSıcak su binlerce yıldır yamaçtan süzülüyor ve her \
         mevsim yeni bir katman bırakıyor.\n\n> Antik Hierapolis kenti hemen \
         tepede, aynı bilet ile gezilebiliyor.",
    ),
    (
        "Nemrut Dağı'nda Gün Batımı",
        "2150 metredeki devasa heykeller Kommagene Krallığı'ndan kalma.",
        "# Nemrut\n\nDoğu terasında gün doğumu, batı terasında gün batımı \
         izlenir. Taş başlar iki bin yıldır aynı ufka bakıyor.",
    ),
];

pub async fn run(
    config_file: Option<&std::path::Path>,
    args: SeedArgs,
) -> Result<(), AppError> {
    let overrides = ServeOverrides {
        database_url: args.database_url.clone(),
        ..ServeOverrides::default()
    };
    let settings = config::load(config_file, &overrides)?;
    telemetry::init(&settings.logging)?;

    let repos = Arc::new(PostgresRepositories::connect(&settings.database).await?);
    let workspace = PostWorkspace::new(repos.clone(), repos);

    let author = AuthorIdentity {
        id: args.author_id,
        email: args.author_email.clone(),
    };

    let mut inserted = 0usize;
    for (title, excerpt, content) in SAMPLE_POSTS {
        let submission = SubmitPost {
            record_id: None,
            form: PostForm {
                title: (*title).to_string(),
                slug: String::new(),
                excerpt: (*excerpt).to_string(),
                content: (*content).to_string(),
                cover_image: None,
                published: true,
            },
        };

        match workspace.submit(&author, submission).await {
            Ok(record) => {
                inserted += 1;
                info!(slug = %record.slug, "seeded post");
            }
            Err(WorkspaceError::DuplicateSlug { slug }) => {
                warn!(%slug, "post already present, skipping");
            }
            Err(err) => return Err(AppError::unexpected(err.to_string())),
        }
    }

    info!(inserted, total = SAMPLE_POSTS.len(), "seed finished");
    Ok(())
}
