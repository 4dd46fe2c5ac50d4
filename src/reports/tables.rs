use beltforge::drive::TransmissionSolution;
use beltforge::optimizer::{DesignCandidate, GenerationReport, OptimizationOutcome};
use beltforge::request::ConveyorRequest;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn designs(request: &ConveyorRequest, outcome: &OptimizationOutcome) {
    let mut table = new_table();

    table.add_row(vec![
        Cell::new("Rank").add_attribute(Attribute::Bold),
        Cell::new("Fitness").fg(Color::Cyan),
        Cell::new("Width"),
        Cell::new("Belt"),
        Cell::new("Gearbox"),
        Cell::new("Chain"),
        Cell::new("Sprockets"),
        Cell::new("Speed"),
        Cell::new("Err %"),
        Cell::new("Power kW"),
        Cell::new("SF").fg(Color::Green),
        Cell::new("Cost $").add_attribute(Attribute::Bold),
    ]);
    align_right(&mut table, 1..=11);

    for (rank, d) in outcome.designs.iter().enumerate() {
        let Some(eval) = &d.evaluation else { continue };
        let (sprockets, speed, err) = match &eval.transmission {
            Some(t) => (
                format!("{}/{}", t.drive_sprocket_teeth, t.driven_sprocket_teeth),
                format!("{:.3}", t.actual_velocity_mps),
                format!("{:.2}", t.velocity_error_percent),
            ),
            None => ("-".into(), "-".into(), "-".into()),
        };
        let width_cell = if d.genes.belt_width_mm == request.belt_width_mm {
            Cell::new(d.genes.belt_width_mm)
        } else {
            Cell::new(d.genes.belt_width_mm).fg(Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(rank + 1).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.4}", d.fitness_score)).fg(Color::Cyan),
            width_cell,
            Cell::new(d.genes.belt_type),
            Cell::new(format!("{:.1}", d.genes.gearbox_ratio)),
            Cell::new(&d.genes.chain_designation),
            Cell::new(sprockets),
            Cell::new(speed),
            Cell::new(err),
            Cell::new(format!("{:.1}", eval.required_power_kw)),
            Cell::new(format!("{:.2}", eval.safety_factor)).fg(Color::Green),
            Cell::new(format!("{:.0}", eval.cost_capital_total)).add_attribute(Attribute::Bold),
        ]);
    }

    println!(
        "\n{} designs after {} generations ({} evaluations)",
        outcome.designs.len(),
        outcome.generations_run,
        outcome.evaluations
    );
    println!("{}", table);
}

pub fn issues(design: &DesignCandidate) {
    if design.invalid_reasons.is_empty() {
        println!("\nBest design has no recorded issues.");
        return;
    }

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Issue").add_attribute(Attribute::Bold),
        Cell::new("Penalty"),
        Cell::new("Detail"),
    ]);
    align_right(&mut table, 1..=1);

    for issue in &design.invalid_reasons {
        let name = Cell::new(issue.category);
        table.add_row(vec![
            if issue.hard { name.fg(Color::Red) } else { name },
            Cell::new(format!("{:.1}", issue.category.penalty())),
            Cell::new(&issue.detail),
        ]);
    }
    println!("\n{}", table);
}

pub fn drive_solutions(solutions: &[TransmissionSolution]) {
    let mut table = new_table();

    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Gearbox"),
        Cell::new("Z1"),
        Cell::new("Z2"),
        Cell::new("Chain"),
        Cell::new("Total i"),
        Cell::new("Speed").fg(Color::Cyan),
        Cell::new("Err %").fg(Color::Cyan),
        Cell::new("F req kN"),
        Cell::new("F allow kN"),
        Cell::new("Margin").fg(Color::Green),
    ]);
    align_right(&mut table, 1..=10);

    for (i, s) in solutions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.1}", s.gearbox_ratio)),
            Cell::new(s.drive_sprocket_teeth),
            Cell::new(s.driven_sprocket_teeth),
            Cell::new(&s.chain_designation),
            Cell::new(format!("{:.2}", s.total_transmission_ratio)),
            Cell::new(format!("{:.3}", s.actual_velocity_mps)).fg(Color::Cyan),
            Cell::new(format!("{:.2}", s.velocity_error_percent)).fg(Color::Cyan),
            Cell::new(format!("{:.2}", s.required_force_kn)),
            Cell::new(format!("{:.2}", s.allowable_force_kn)),
            Cell::new(format!("{:.1}", s.safety_margin)).fg(Color::Green),
        ]);
    }
    println!("\n{}", table);
}

pub fn history(history: &[GenerationReport]) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Gen").add_attribute(Attribute::Bold),
        Cell::new("Best").fg(Color::Cyan),
        Cell::new("Valid"),
        Cell::new("Diversity"),
        Cell::new("Mutation"),
    ]);
    align_right(&mut table, 0..=4);

    for r in history {
        table.add_row(vec![
            Cell::new(r.generation),
            Cell::new(format!("{:.4}", r.best_fitness)).fg(Color::Cyan),
            Cell::new(format!("{}/{}", r.valid_count, r.population_size)),
            Cell::new(format!("{:.3}", r.diversity)),
            Cell::new(format!("{:.3}", r.mutation_rate)),
        ]);
    }
    println!("\n{}", table);
}
