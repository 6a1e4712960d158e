//! Fixed files added to every new repository

pub const MIT_LICENSE: &str = r#"MIT License

Copyright (c) 2024 IITM Task Handler

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE."#;

/// `my-cool-task` becomes `My Cool Task`.
fn title_case(task: &str) -> String {
    task.replace('-', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn readme(brief: &str, task: &str, email: &str, repo_name: &str) -> String {
    let title = title_case(task);
    format!(
        r#"# {title}

## Overview
{brief}

## Project Details
- **Task**: {task}
- **Generated for**: {email}
- **Repository**: {repo_name}
- **Generated by**: IITM Task Handler API

## Setup Instructions

### Prerequisites
- A modern web browser
- Optional: Local web server (for development)

### Installation
1. Clone this repository:
   ```bash
   git clone https://github.com/{repo_name}.git
   cd {repo_name}
   ```

2. Open the application:
   - **Option 1**: Open `index.html` directly in your browser
   - **Option 2**: Serve using a local web server:
     ```bash
     # Using Python
     python -m http.server 8000

     # Using Node.js
     npx serve .

     # Using PHP
     php -S localhost:8000
     ```

3. Navigate to `http://localhost:8000` (if using a server) or open the HTML file directly

## Usage

### Basic Usage
1. Open the application in your web browser
2. Follow the on-screen instructions
3. Interact with the interface as designed

### URL Parameters
The application supports URL parameters for enhanced functionality:
- `?url=<image_url>` - Pass an image URL for processing
- `?data=<json_data>` - Pass JSON data for processing

### Features
- Responsive design that works on desktop and mobile
- Modern, clean user interface
- Error handling and user feedback
- Cross-browser compatibility

## Code Structure

### Files
- `index.html` - Main HTML structure
- `style.css` - CSS styling and responsive design
- `script.js` - JavaScript functionality and interactions
- `README.md` - This documentation file
- `LICENSE` - MIT License

### Key Components
- **HTML**: Semantic structure with accessibility in mind
- **CSS**: Modern styling with CSS Grid and Flexbox
- **JavaScript**: Vanilla JS with modern ES6+ features

## Development

### Local Development
1. Make changes to the source files
2. Refresh your browser to see changes
3. Test across different browsers and devices

### Customization
- Modify `style.css` for visual changes
- Update `script.js` for functionality changes
- Edit `index.html` for structural changes

## Browser Support
- Chrome 60+
- Firefox 55+
- Safari 12+
- Edge 79+

## Troubleshooting

### Common Issues
1. **Page not loading**: Check if all files are present
2. **Styling issues**: Ensure CSS file is linked correctly
3. **JavaScript errors**: Check browser console for errors

### Getting Help
- Check the browser console for error messages
- Ensure all files are in the same directory
- Verify file permissions

## License
This project is licensed under the MIT License - see the [LICENSE](LICENSE) file for details.

## Contributing
This is an automatically generated project. For modifications, please contact the IITM Task Handler.

## Generated by
IITM Task Handler API - Automated code generation and repository management system.

---
*This README was automatically generated as part of the IITM task submission process.*
"#
    )
}
