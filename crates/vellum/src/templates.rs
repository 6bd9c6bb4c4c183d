//! Starter diagrams.
//!
//! A small catalog of Mermaid snippets an editor can offer as a starting
//! point. Loading one replaces the editor text, exactly like typing it.

/// A named starter diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Stable lookup key, e.g. `"sequence"`.
    pub key: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Diagram source text.
    pub source: &'static str,
}

const TEMPLATES: &[Template] = &[
    Template {
        key: "flowchart",
        name: "Flowchart",
        source: "---
title: Node with text
---
flowchart LR
    id1[This is the text in the box]",
    },
    Template {
        key: "gantt",
        name: "Gantt Chart",
        source: "gantt
    title A Gantt Diagram
    dateFormat YYYY-MM-DD
    section Section
        A task          :a1, 2014-01-01, 30d
        Another task    :after a1, 20d
    section Another
        Task in Another :2014-01-12, 12d
        another task    :24d",
    },
    Template {
        key: "sequence",
        name: "Sequence Diagram",
        source: "sequenceDiagram
    participant A as Alice
    participant B as Bob
    A->>B: Hello Bob, how are you?
    B-->>A: Great!",
    },
    Template {
        key: "classDiagram",
        name: "Class Diagram",
        source: "classDiagram
    class Animal {
        +String name
        +int age
        +makeSound()
    }
    class Dog {
        +String breed
        +bark()
    }
    Animal <|-- Dog",
    },
    Template {
        key: "stateDiagram",
        name: "State Diagram",
        source: "stateDiagram-v2
    [*] --> Still
    Still --> [*]
    Still --> Moving
    Moving --> Still
    Moving --> Crash
    Crash --> [*]",
    },
    Template {
        key: "pie",
        name: "Pie Chart",
        source: "pie title Pets adopted by volunteers
    \"Dogs\" : 386
    \"Cats\" : 85
    \"Rats\" : 15",
    },
    Template {
        key: "journey",
        name: "User Journey",
        source: "journey
    title My working day
    section Go to work
      Make tea: 5: Me
      Go upstairs: 3: Me
      Do work: 1: Me, Cat
    section Go home
      Go downstairs: 5: Me
      Sit down: 5: Me",
    },
    Template {
        key: "mindmap",
        name: "Mindmap",
        source: "mindmap
  root((mindmap))
    Origins
      Long history
      ::icon(fa fa-book)
      Popularisation
        British popular psychology author Tony Buzan
    Research
      On effectiveness<br/>and features
      On Automatic creation
        Uses
            Creative techniques
            Strategic planning
            Argument mapping
    Tools
      Pen and paper
      Mermaid",
    },
    Template {
        key: "timeline",
        name: "Timeline",
        source: "timeline
    title History of Social Media Platform
    2002 : LinkedIn
    2004 : Facebook
         : Google
    2005 : Youtube
    2006 : Twitter",
    },
];

/// All templates, in menu order.
pub fn templates() -> &'static [Template] {
    TEMPLATES
}

/// Look up a template by key (case-insensitive).
///
/// `class` and `state` are accepted for `classDiagram` and `stateDiagram`.
pub fn template(key: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|template| {
        template.key.eq_ignore_ascii_case(key)
            || template
                .key
                .strip_suffix("Diagram")
                .is_some_and(|short| short.eq_ignore_ascii_case(key))
    })
}
