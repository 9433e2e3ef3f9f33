use anyhow::{bail, Context, Result};
use recipe_catalog::{CatalogError, Config, Recipe, RecipeFilter, RecipeStore};
use std::env;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: recipe-catalog <init | list [search] | show <id> | delete <id> | categories | count>";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recipe_catalog=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_env().context("Failed to load configuration")?;

    match args.first().map(String::as_str) {
        Some("init") => run_init(&config),
        Some("list") => run_list(&config, args.get(1).map(String::as_str)),
        Some("show") => run_show(&config, required_id(&args)?),
        Some("delete") => run_delete(&config, required_id(&args)?),
        Some("categories") => {
            for name in config.taxonomy.names() {
                println!("{}", name);
            }
            Ok(())
        }
        Some("count") => {
            let store = open_store(&config)?;
            println!("{}", store.count()?);
            Ok(())
        }
        _ => bail!(USAGE),
    }
}

fn required_id(args: &[String]) -> Result<&str> {
    match args.get(1) {
        Some(id) => Ok(id.as_str()),
        None => bail!(USAGE),
    }
}

fn open_store(config: &Config) -> Result<RecipeStore> {
    RecipeStore::open(&config.database_path, config.taxonomy.clone())
        .with_context(|| format!("Failed to open database at {}", config.database_path.display()))
}

fn run_init(config: &Config) -> Result<()> {
    println!("🗄️  Recipe Catalog - database setup");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = open_store(config)?;
    println!("✓ Database ready at {} (WAL mode)", config.database_path.display());
    println!("✓ {} recipes stored", store.count()?);

    Ok(())
}

fn run_list(config: &Config, search: Option<&str>) -> Result<()> {
    let store = open_store(config)?;
    let filter = match search {
        Some(text) => RecipeFilter::default().with_search(text),
        None => RecipeFilter::default(),
    };

    let recipes = store.list(&filter)?;
    for recipe in &recipes {
        println!(
            "{}  {:<40} {:>6} {:>4} min  {}",
            recipe.id,
            recipe.title,
            recipe.difficulty,
            recipe.prep_time,
            recipe.categories.join(", ")
        );
    }
    println!("\n{} recipe(s)", recipes.len());

    Ok(())
}

fn run_show(config: &Config, id: &str) -> Result<()> {
    let store = open_store(config)?;
    match store.get(id) {
        Ok(recipe) => {
            print_recipe(&recipe);
            Ok(())
        }
        Err(CatalogError::NotFound) => bail!("❌ Recipe {} not found", id),
        Err(e) => Err(e.into()),
    }
}

fn run_delete(config: &Config, id: &str) -> Result<()> {
    let store = open_store(config)?;
    match store.delete(id) {
        Ok(()) => {
            println!("✓ Deleted {}", id);
            Ok(())
        }
        Err(CatalogError::NotFound) => bail!("❌ Recipe {} not found", id),
        Err(e) => Err(e.into()),
    }
}

fn print_recipe(recipe: &Recipe) {
    println!("🍽️  {}", recipe.title);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Difficulty: {}", recipe.difficulty);
    println!("Prep time:  {} min", recipe.prep_time);
    println!("Servings:   {}", recipe.servings);
    println!("Categories: {}", recipe.categories.join(", "));
    if let Some(image) = &recipe.image {
        println!("Image:      {} ({} bytes)", image.content_type, image.data.len());
    }

    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  • {}", ingredient.text);
    }

    println!("\nSteps:");
    for step in &recipe.steps {
        println!("  {}. {}", step.step_number, step.description);
    }

    println!("\nCreated {}  Updated {}", recipe.created_at.to_rfc3339(), recipe.updated_at.to_rfc3339());
}
