use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{PlanError, Result};
use crate::models::{MealPlanResponse, Recipe, RecipeRecord};
use crate::state::RecipeCatalog;

/// Load recipes from a CSV or JSON file, chosen by extension.
pub fn load_recipes<P: AsRef<Path>>(path: P) -> Result<Vec<Recipe>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    let records: Vec<RecipeRecord> = match extension.as_deref() {
        Some("csv") => {
            let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
            reader
                .deserialize()
                .collect::<std::result::Result<Vec<RecipeRecord>, csv::Error>>()?
        }
        Some("json") => {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        }
        _ => {
            return Err(PlanError::InvalidInput(format!(
                "Unsupported catalog format: {}",
                path.display()
            )));
        }
    };

    debug!(rows = records.len(), path = %path.display(), "read catalog rows");
    records.into_iter().map(Recipe::try_from).collect()
}

/// Load a catalog file into an immutable [`RecipeCatalog`].
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<RecipeCatalog> {
    let catalog = RecipeCatalog::new(load_recipes(&path)?);
    info!(recipes = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Persist a plan as the single most-recent result, replacing any previous one.
pub fn save_plan<P: AsRef<Path>>(path: P, plan: &MealPlanResponse) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "plan saved");
    Ok(())
}

/// Load the most recently saved plan.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<MealPlanResponse> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, Builder};

    use crate::models::{MealType, PlanTargets};

    #[test]
    fn test_load_csv_catalog() {
        let csv = "id,name,energy_kcal,carbs,total_fats,protein,categories,servings\n\
                   1,Pancakes,420,60,12,10,\"0,1\",2\n\
                   2,Chili,610,45,22,38,\"2,4\",4\n";

        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(csv.as_bytes()).unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);

        let chili = catalog.get(2).unwrap();
        assert_eq!(chili.fats, 22.0);
        assert_eq!(chili.servings, 4);
        assert!(chili.suits(MealType::Dinner));
        assert!(!chili.suits(MealType::Breakfast));
    }

    #[test]
    fn test_load_json_with_fat_alias_and_default_servings() {
        let json = r#"[
            {"id": 5, "name": "Apple", "energy_kcal": 95, "carbs": 25, "fat": 0.3, "protein": 0.5, "categories": "1,3"}
        ]"#;

        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let recipes = load_recipes(file.path()).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].servings, 1);
        assert_eq!(recipes[0].fats, 0.3);
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let file = Builder::new().suffix(".xml").tempfile().unwrap();
        assert!(matches!(
            load_recipes(file.path()),
            Err(PlanError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_save_plan_creates_directories_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output").join("last_plan.json");

        let mut plan = MealPlanResponse {
            success: true,
            meal_plan: Vec::new(),
            targets: PlanTargets {
                calories_per_day: 2000.0,
                carbs: 250,
                protein: 100,
                fats: 66,
            },
        };
        save_plan(&path, &plan).unwrap();

        plan.targets.calories_per_day = 1800.0;
        save_plan(&path, &plan).unwrap();

        let loaded = load_plan(&path).unwrap();
        assert_eq!(loaded, plan);
    }
}
