use clap::Parser;
use hexgen::export::MapExport;
use hexgen::preview::{save_biome_png, save_elevation_png};
use hexgen::rivers::summarize_network;
use hexgen::{HexGrid, MapGenerationParams, MapGenerator, MapStyle};
use std::path::PathBuf;

/// Генератор гексагональных карт для Chronicles of the Hexlands
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Сид генерации (перекрывает значение из конфигурации)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Стиль карты без конфигурации: continents, archipelago, highland, wetland
    #[arg(long, default_value = "continents")]
    style: String,

    /// Каталог для результатов (по умолчанию: ./out)
    #[arg(short, long, default_value = "out")]
    output: PathBuf,

    /// Радиус клетки на превью в пикселях
    #[arg(long, default_value_t = 8)]
    cell_size: u32,
}

fn parse_style(name: &str) -> Result<MapStyle, Box<dyn std::error::Error>> {
    match name.to_lowercase().as_str() {
        "continents" => Ok(MapStyle::Continents),
        "archipelago" => Ok(MapStyle::Archipelago),
        "highland" => Ok(MapStyle::Highland),
        "wetland" => Ok(MapStyle::Wetland),
        other => Err(format!("неизвестный стиль карты: {other}").into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => {
            println!("🔍 Загрузка конфигурации...");
            MapGenerationParams::from_toml_file(path.to_str().unwrap())?
        }
        None => MapGenerationParams::for_style(parse_style(&cli.style)?, 0),
    };
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }
    let seed = params.seed;

    println!(
        "Генерация карты {}×{} (сид {})...",
        params.width, params.height, seed
    );
    let mut grid = HexGrid::new(params.width, params.height);
    let mut generator = MapGenerator::new(params);
    generator.set_progress_callback(Box::new(|phase, fraction| {
        println!("  [{phase}] {:.0}%", fraction * 100.0);
    }));
    generator.generate(&mut grid, seed);

    let summary = summarize_network(&grid);
    println!(
        "Реки: {} клеток, {} систем, самый длинный пробег — {} рёбер",
        summary.river_cells, summary.networks, summary.longest_run
    );

    std::fs::create_dir_all(&cli.output)?;
    let out = |name: &str| cli.output.join(name).to_string_lossy().into_owned();
    save_biome_png(&grid, &out("biomes.png"), cli.cell_size)?;
    save_elevation_png(&grid, &out("height.png"), cli.cell_size)?;
    MapExport::from_grid(&grid, seed).save_json(&out("map.json"))?;

    println!("\nГотово! Результаты сохранены в {:?}", cli.output);
    Ok(())
}
