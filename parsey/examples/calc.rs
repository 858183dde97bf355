use parsey::{Grammar, Value, ValuatorError};
use rustyline::error::ReadlineError;

fn operand(args: &[Value<f64>], idx: usize) -> Result<f64, ValuatorError> {
    args.get(idx)
        .and_then(Value::evaluated)
        .copied()
        .ok_or_else(|| format!("missing operand #{}", idx).into())
}

fn build_grammar() -> parsey::Result<Grammar<f64>> {
    let mut g: Grammar<f64> = Grammar::new();
    g.rule_with("expr -> term", |n| operand(&n, 0))?;
    g.rule_with("expr -> expr + term", |n| Ok(operand(&n, 0)? + operand(&n, 2)?))?;
    g.rule_with("expr -> expr - term", |n| Ok(operand(&n, 0)? - operand(&n, 2)?))?;
    g.rule_with("term -> factor", |n| operand(&n, 0))?;
    g.rule_with("term -> term * factor", |n| Ok(operand(&n, 0)? * operand(&n, 2)?))?;
    g.rule_with("term -> term '/' factor", |n| Ok(operand(&n, 0)? / operand(&n, 2)?))?;
    g.rule_with("term -> term % factor", |n| Ok(operand(&n, 0)? % operand(&n, 2)?))?;
    g.rule_with("factor -> power", |n| operand(&n, 0))?;
    g.rule_with("factor -> - factor", |n| Ok(-operand(&n, 1)?))?;
    g.rule_with("power -> group", |n| operand(&n, 0))?;
    g.rule_with("power -> group ^ factor", |n| Ok(operand(&n, 0)?.powf(operand(&n, 2)?)))?;
    g.rule_with("group -> ( expr )", |n| operand(&n, 1))?;
    g.rule_with(r"group -> /^(\d+\.?\d*|\.\d+)$/", |n| {
        Ok(n[0].token().unwrap_or_default().parse()?)
    })?;
    Ok(g)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let grammar = build_grammar()?;
    if std::env::args().len() > 1 {
        let expr = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
        match parsey::parse(&expr, &grammar) {
            Ok(value) => println!("{}", value),
            Err(e) => println!("Parse err: {}", e),
        }
        return Ok(());
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    loop {
        match rl.readline("~> ") {
            Ok(expr) => {
                rl.add_history_entry(expr.as_str())?;
                match parsey::parse(&expr, &grammar) {
                    Ok(value) => println!("{}", value),
                    Err(e) => println!("Parse err: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
